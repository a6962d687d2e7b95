//! HTTP endpoints serving a loaded [Schedule]
use crate::Schedule;
use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

/// Body of every response whose serialization failed
pub const INTERNAL_ERROR_BODY: &str = "500 - Something bad happened!";

/// Registers the endpoints. The app must hold a `web::Data<Schedule>`
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(schedules_of_route)
        .service(trip_schedule)
        .service(health);
}

#[derive(Serialize)]
struct Health {
    trips: usize,
    stop_times: usize,
    routes: usize,
    read_duration_ms: i64,
}

#[get("/schedules/{route_id}")]
async fn schedules_of_route(
    schedule: web::Data<Schedule>,
    path: web::Path<String>,
) -> impl Responder {
    let route_id = path.into_inner();
    json_response(&schedule.assemble_schedule(&route_id))
}

#[get("/trips/{trip_id}")]
async fn trip_schedule(schedule: web::Data<Schedule>, path: web::Path<String>) -> impl Responder {
    let trip_id = path.into_inner();
    match schedule.trip_schedule(&trip_id) {
        Some(trip) => json_response(&trip),
        None => HttpResponse::NotFound()
            .insert_header(("Content-Type", "text/plain"))
            .body(format!("unknown trip {}", trip_id)),
    }
}

#[get("/health")]
async fn health(schedule: web::Data<Schedule>) -> impl Responder {
    json_response(&Health {
        trips: schedule.nb_trips(),
        stop_times: schedule.nb_stop_times(),
        routes: schedule.nb_routes(),
        read_duration_ms: schedule.read_duration,
    })
}

/// `200` with the json of `value`, or `500` if it cannot be serialized
pub fn json_response<T: Serialize + ?Sized>(value: &T) -> HttpResponse {
    match serde_json::to_string(value) {
        Ok(body) => HttpResponse::Ok()
            .insert_header(("Content-Type", "application/json"))
            .body(body),
        Err(e) => {
            log::error!("impossible to serialize response: {}", e);
            HttpResponse::InternalServerError()
                .insert_header(("Content-Type", "text/plain"))
                .body(INTERNAL_ERROR_BODY)
        }
    }
}

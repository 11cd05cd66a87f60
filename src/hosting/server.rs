use super::{Casino, TableSummary};
use crate::config::Config;
use crate::game::player::Chips;
use crate::game::{Blinds, TableId, Variant};
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use serde::Deserialize;

pub struct Server;

impl Server {
    /// Starts the HTTP/WebSocket front door: an `actix-web` server wrapping
    /// a shared `Casino`, with permissive CORS since no browser client
    /// ships alongside this crate.
    pub async fn run(config: &Config) -> Result<(), std::io::Error> {
        let state = web::Data::new(Casino::from_config(config));
        let bind_addr = config.bind_addr.clone();
        log::info!("starting hosting server on {bind_addr}");
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
                .app_data(state.clone())
                .route("/tables", web::post().to(create_table))
                .route("/tables", web::get().to(list_tables))
                .route("/tables/{id}/join", web::get().to(join_table))
        })
        .bind(bind_addr)?
        .run()
        .await
    }
}

#[derive(Debug, Deserialize)]
struct CreateTableRequest {
    variant: String,
    #[serde(default)]
    small_blind: Option<Chips>,
    #[serde(default)]
    big_blind: Option<Chips>,
    #[serde(default = "default_seats")]
    seats: usize,
    #[serde(default)]
    bot_count: usize,
    starting_stack: Option<Chips>,
}

fn default_seats() -> usize {
    6
}

#[derive(Debug, Deserialize)]
struct JoinQuery {
    #[serde(default = "default_name")]
    name: String,
}

fn default_name() -> String {
    "player".to_string()
}

async fn create_table(casino: web::Data<Casino>, body: web::Json<CreateTableRequest>) -> impl Responder {
    let variant = match body.variant.to_lowercase().as_str() {
        "nolimit" | "no_limit" | "nl" => Variant::NoLimit,
        "fixedlimit" | "fixed_limit" | "fl" => Variant::FixedLimit,
        other => return HttpResponse::BadRequest().body(format!("unknown variant '{other}'")),
    };
    let defaults = casino.default_blinds();
    let blinds = Blinds {
        small_blind: body.small_blind.unwrap_or(defaults.small_blind),
        big_blind: body.big_blind.unwrap_or(defaults.big_blind),
    };
    let id = casino
        .open_table(variant, blinds, body.seats, body.bot_count, body.starting_stack)
        .await;
    HttpResponse::Ok().json(serde_json::json!({ "table_id": id.to_string() }))
}

async fn list_tables(casino: web::Data<Casino>) -> impl Responder {
    let tables: Vec<_> = casino.list().await.iter().map(summary_json).collect();
    HttpResponse::Ok().json(serde_json::json!({ "tables": tables }))
}

fn summary_json(t: &TableSummary) -> serde_json::Value {
    serde_json::json!({
        "table_id": t.id.to_string(),
        "variant": format!("{:?}", t.variant),
        "small_blind": t.small_blind,
        "big_blind": t.big_blind,
        "seats_total": t.seats_total,
        "seats_open": t.seats_open,
    })
}

async fn join_table(
    casino: web::Data<Casino>,
    path: web::Path<String>,
    query: web::Query<JoinQuery>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let id = match path.into_inner().parse::<uuid::Uuid>() {
        Ok(uuid) => TableId(uuid),
        Err(_) => return HttpResponse::BadRequest().body("malformed table id"),
    };
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            match casino.bridge(id, query.into_inner().name, session, stream).await {
                Ok(()) => response.map_into_left_body(),
                Err(e) => HttpResponse::NotFound().body(e.to_string()).map_into_right_body(),
            }
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()).map_into_right_body(),
    }
}

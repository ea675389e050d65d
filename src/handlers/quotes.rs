//! Quote API handlers
//!
//! ## API list
//!
//! - GET /quotes - board with every tracked metal (per-metal errors inline)
//! - GET /quotes/{symbol} - single spot quote (XAU or XAG)

use actix_web::{web, HttpResponse, Result};

use crate::models::{ApiResponse, Quote};
use crate::services::quote_service::{setup_instructions, QuoteError, QuoteService};

/// Get the full dashboard board
///
/// GET /api/v1/quotes
///
/// Always 200: when the provider key is missing the board carries setup
/// instructions instead of quotes, and per-metal fetch failures are data,
/// not an HTTP error.
pub async fn get_board(service: web::Data<QuoteService>) -> Result<HttpResponse> {
    let board = service.fetch_board().await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(board)))
}

/// Get a single spot quote
///
/// GET /api/v1/quotes/{symbol}
///
/// # Parameters
/// - symbol: ticker (XAU or XAG, case-insensitive)
pub async fn get_quote(
    path: web::Path<String>,
    service: web::Data<QuoteService>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();

    match service.fetch_spot(&symbol).await {
        Ok(quote) => Ok(HttpResponse::Ok().json(ApiResponse::success(quote))),
        Err(QuoteError::NotConfigured) => Ok(HttpResponse::ServiceUnavailable()
            .json(ApiResponse::<Quote>::error(setup_instructions()))),
        Err(e @ QuoteError::UnknownSymbol(_)) => {
            Ok(HttpResponse::BadRequest().json(ApiResponse::<Quote>::error(e.to_string())))
        }
        Err(e) => Ok(HttpResponse::BadGateway().json(ApiResponse::<Quote>::error(e.to_string()))),
    }
}

/// Configure quote routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quotes")
            .route("", web::get().to(get_board))
            .route("/{symbol}", web::get().to(get_quote)),
    );
}

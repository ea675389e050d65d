//! Dashboard page handler
//!
//! Server-rendered HTML shell. Each page load is one render pass: the key
//! presence is checked freshly, then either the setup card or one card per
//! metal is rendered. Refresh is manual (reload link), no auto-refresh.

use actix_web::{http::header::ContentType, web, HttpResponse, Result};

use crate::models::DashboardBoard;
use crate::services::quote_service::QuoteService;

/// Dashboard page
///
/// GET /
pub async fn index(service: web::Data<QuoteService>) -> Result<HttpResponse> {
    let board = service.fetch_board().await;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_board(&board)))
}

/// Minimal HTML escaping for interpolated text.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render one board as a full HTML page. Pure, so the render path can be
/// tested without a server.
pub fn render_board(board: &DashboardBoard) -> String {
    let mut cards = String::new();

    if !board.configured {
        let instructions = board.instructions.as_deref().unwrap_or_default();
        cards.push_str(&format!(
            "<div class=\"card setup\"><h2>Setup required</h2><p>{}</p></div>",
            escape(instructions)
        ));
    } else {
        for entry in &board.quotes {
            match (&entry.quote, &entry.error) {
                (Some(quote), _) => {
                    let mut extra = String::new();
                    if let (Some(bid), Some(ask)) = (quote.bid, quote.ask) {
                        extra = format!(
                            "<p class=\"sub\">bid {:.2} / ask {:.2}</p>",
                            bid, ask
                        );
                    }
                    cards.push_str(&format!(
                        "<div class=\"card\"><h2>{} ({})</h2>\
                         <p class=\"price\">${:.2}</p>{}\
                         <p class=\"sub\">per oz &middot; {}</p></div>",
                        escape(&quote.name),
                        escape(&quote.symbol),
                        quote.price,
                        extra,
                        escape(&quote.retrieved_at)
                    ));
                }
                (None, Some(error)) => {
                    cards.push_str(&format!(
                        "<div class=\"card error\"><h2>{} ({})</h2>\
                         <p class=\"err\">{}</p></div>",
                        escape(&entry.name),
                        escape(&entry.symbol),
                        escape(error)
                    ));
                }
                (None, None) => {}
            }
        }

        if let Some(ratio) = board.gold_silver_ratio {
            cards.push_str(&format!(
                "<div class=\"card ratio\"><h2>Gold/Silver ratio</h2>\
                 <p class=\"price\">{:.1}</p></div>",
                ratio
            ));
        }
    }

    format!(
        "<!DOCTYPE html>\
         <html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>Precious Metals Dashboard</title>\
         <style>\
         body{{background:#0e1117;color:#fff;font-family:sans-serif;margin:0;padding:24px}}\
         h1{{color:#ffd700}}\
         .cards{{display:flex;flex-wrap:wrap;gap:16px}}\
         .card{{background:#1e2530;border:1px solid #333;border-radius:12px;padding:20px;min-width:220px}}\
         .card.error{{border-color:#a33}}\
         .price{{font-size:2rem;margin:8px 0}}\
         .sub{{color:#888;font-size:.85rem;margin:4px 0}}\
         .err{{color:#e88}}\
         a{{color:#ffd700}}\
         </style></head><body>\
         <h1>Precious Metals Dashboard</h1>\
         <div class=\"cards\">{}</div>\
         <p><a href=\"/\">Refresh</a> (manual only; the quote provider is rate limited)</p>\
         </body></html>",
        cards
    )
}

/// Configure the dashboard route
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
}

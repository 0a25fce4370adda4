use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::collectors::boards::Board;
use crate::collectors::{JobCollector, Search};
use crate::error::AppError;
use crate::models::listing::{RawListing, Source};
use crate::pipeline::normalize::collapse_whitespace;

/// Collector for server-rendered job boards described by a [`Board`].
pub struct HtmlCollector {
    board: &'static Board,
    client: reqwest::Client,
}

impl HtmlCollector {
    pub fn new(board: &'static Board, client: reqwest::Client) -> Self {
        Self { board, client }
    }
}

#[async_trait]
impl JobCollector for HtmlCollector {
    fn source(&self) -> Source {
        self.board.source
    }

    fn searches(&self) -> Vec<Search> {
        self.board
            .queries
            .iter()
            .flat_map(|query| {
                self.board.areas.iter().map(move |area| Search {
                    query: (*query).to_string(),
                    area: (*area).to_string(),
                })
            })
            .collect()
    }

    async fn fetch(&self, query: &str, area: &str) -> Result<Vec<RawListing>, AppError> {
        let source = self.board.source;
        let url = search_url(self.board, query, area)?;

        let resp = self
            .client
            .get(url.as_str())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("{source} request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "{source} returned {} for '{query}'",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("{source} body unreadable: {e}")))?;

        parse_cards(self.board, &body, url.as_str(), area)
    }
}

pub fn search_url(board: &Board, query: &str, area: &str) -> Result<Url, AppError> {
    let base = format!("{}{}", board.origin, board.search_path);
    let mut params: Vec<(&str, &str)> = vec![(board.query_param, query), (board.area_param, area)];
    params.extend_from_slice(board.extra_params);
    Url::parse_with_params(&base, &params)
        .map_err(|e| AppError::Internal(format!("Bad search URL for {}: {e}", board.source)))
}

fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::Internal(format!("Bad selector '{css}': {e}")))
}

fn text_of(el: ElementRef<'_>, limit: Option<usize>) -> Option<String> {
    let text: String = el.text().collect();
    let text = match limit {
        Some(n) => text.chars().take(n).collect(),
        None => text,
    };
    Some(collapse_whitespace(&text)).filter(|t| !t.is_empty())
}

fn resolve_link(board: &Board, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let href = if board.strip_link_query {
        href.split('?').next().unwrap_or(href)
    } else {
        href
    };
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    Url::parse(board.origin)
        .and_then(|origin| origin.join(href))
        .map(|u| u.to_string())
        .ok()
}

/// Turn a search results page into raw listings. Cards without a title are skipped.
pub fn parse_cards(
    board: &Board,
    html: &str,
    search_url: &str,
    area: &str,
) -> Result<Vec<RawListing>, AppError> {
    let s = &board.selectors;
    let card_sel = selector(s.card)?;
    let title_sel = selector(s.title)?;
    let link_sel = s.link.map(selector).transpose()?;
    let company_sel = selector(s.company)?;
    let location_sel = selector(s.location)?;
    let snippet_sel = s.snippet.map(selector).transpose()?;
    let date_sel = s.date.map(selector).transpose()?;

    let document = Html::parse_document(html);
    let mut listings = Vec::new();

    for card in document.select(&card_sel) {
        let Some(title_el) = card.select(&title_sel).next() else {
            continue;
        };
        let Some(title) = text_of(title_el, None) else {
            continue;
        };

        let link_el = match &link_sel {
            Some(sel) => card.select(sel).next(),
            None => Some(title_el),
        };
        let link = link_el
            .and_then(|el| el.value().attr("href"))
            .and_then(|href| resolve_link(board, href))
            .unwrap_or_else(|| search_url.to_string());

        let first_text = |sel: &Selector, limit: Option<usize>| {
            card.select(sel).next().and_then(|el| text_of(el, limit))
        };

        let location = first_text(&location_sel, None)
            .or_else(|| board.area_as_location.then(|| area.to_string()));

        let date_posted = date_sel.as_ref().and_then(|sel| {
            let el = card.select(sel).next()?;
            match s.date_attr {
                Some(attr) => el.value().attr(attr).map(str::to_string),
                None => text_of(el, None),
            }
        });

        listings.push(RawListing {
            title,
            company: first_text(&company_sel, None),
            location,
            snippet: snippet_sel
                .as_ref()
                .and_then(|sel| first_text(sel, board.snippet_limit)),
            link,
            source: board.source,
            date_posted,
        });
    }

    Ok(listings)
}

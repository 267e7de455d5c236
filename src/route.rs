//! Page routes and the `id` / `ref` query-string contract.

use serde::{Deserialize, Serialize};

use crate::model::Collection;

/// A page of the app.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    List(Collection),
    Detail { collection: Collection, query: String },
}

impl Route {
    /// Parses `characters`, `location?id=3&ref=character_1`, `index`, ...
    /// A trailing `.html` is accepted.
    pub fn parse(input: &str) -> Option<Route> {
        let input = input.trim().trim_start_matches('/');
        let (page, query) = input.split_once('?').unwrap_or((input, ""));
        let page = page.trim_end_matches(".html");
        let collection = Collection::from_name(page)?;
        if page == collection.endpoint() {
            Some(Route::Detail {
                collection,
                query: query.to_string(),
            })
        } else {
            Some(Route::List(collection))
        }
    }

    pub fn detail(collection: Collection, id: u32, referrer: &str) -> Route {
        Route::Detail {
            collection,
            query: format!("id={id}&ref={referrer}"),
        }
    }
}

/// Parsed query string of a detail page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailQuery {
    pub id: Option<u32>,
    pub referrer: Option<String>,
}

impl DetailQuery {
    pub fn parse(query: &str) -> Self {
        let mut parsed = DetailQuery::default();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = urlencoding::decode(value)
                .map(|value| value.into_owned())
                .unwrap_or_else(|_| value.to_string());
            match key {
                "id" => parsed.id = parse_id(&value),
                "ref" if !value.is_empty() => parsed.referrer = Some(value),
                _ => {}
            }
        }
        parsed
    }
}

/// Positive integer ids only; anything else means "no id".
pub fn parse_id(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|id| *id > 0)
}

/// Where "back" leads from a detail page of `collection` opened with `referrer`.
///
/// `referrer` is `<collection>_<id>` (another detail page) or `<collection>`
/// (a list page); anything unrecognized falls back to the list of
/// `collection`.
pub fn back_target(collection: Collection, referrer: Option<&str>) -> Route {
    let fallback = Route::List(collection);
    let Some(referrer) = referrer else {
        return fallback;
    };
    let (page, id) = match referrer.split_once('_') {
        Some((page, id)) => (page, parse_id(id)),
        None => (referrer, None),
    };
    let Some(target) = Collection::from_name(page) else {
        return fallback;
    };
    match id {
        Some(id) if page == target.endpoint() => Route::Detail {
            collection: target,
            query: format!("id={id}"),
        },
        _ => Route::List(target),
    }
}

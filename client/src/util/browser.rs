//! Window and document accessors.
//!
//! Everything here returns `None` (or does nothing) outside the browser.

/// Content of `<meta name="{name}" content="…">` in the current document.
pub fn meta_content(name: &str) -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        let document = web_sys::window()?.document()?;
        let selector = format!("meta[name=\"{name}\"]");
        let element = document.query_selector(&selector).ok().flatten()?;
        element
            .get_attribute("content")
            .filter(|content| !content.is_empty())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = name;
        None
    }
}

/// `window.location.origin`, e.g. `https://inkblink.app`.
pub fn origin() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()?.location().origin().ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Remove and return the URL fragment if it carries auth parameters.
///
/// The fragment is dropped from the address bar with `history.replaceState`
/// so tokens do not linger in history or get bookmarked.
pub fn take_auth_fragment() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        let window = web_sys::window()?;
        let location = window.location();
        let hash = location.hash().ok()?;
        if !is_auth_fragment(&hash) {
            return None;
        }
        let clean = format!(
            "{}{}",
            location.pathname().unwrap_or_default(),
            location.search().unwrap_or_default()
        );
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&clean));
        }
        Some(hash)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Send the whole window to `url` (used for OAuth provider pages).
pub fn assign_location(url: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().assign(url);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = url;
    }
}

pub(crate) fn is_auth_fragment(hash: &str) -> bool {
    let hash = hash.strip_prefix('#').unwrap_or(hash);
    hash.split('&').any(|pair| {
        let key = pair.split_once('=').map_or(pair, |(k, _)| k);
        matches!(key, "access_token" | "error" | "error_description")
    })
}

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

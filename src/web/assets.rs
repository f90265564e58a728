use mime_guess::mime;
use rust_embed::RustEmbed;
use std::borrow::Cow;

/// Stylesheets and scripts for the browser UI, embedded into the binary.
#[derive(RustEmbed)]
#[folder = "assets/static"]
#[include = "**/*"]
pub struct StaticAssets;

/// Provides (Bytes, Content-Type) for a requested asset, or `None` if the
/// binary does not carry it.
pub fn load(path: &str) -> Option<(Cow<'static, [u8]>, String)> {
    let norm = normalize(path)?;
    StaticAssets::get(&norm).map(|file| (file.data, content_type(&norm)))
}

fn normalize(raw: &str) -> Option<String> {
    let p = raw.trim_start_matches('/').trim();
    if p.is_empty() || p.split('/').any(|segment| segment == "..") {
        None
    } else {
        Some(p.to_string())
    }
}

fn content_type(path: &str) -> String {
    let guess = mime_guess::from_path(path).first_or(mime::APPLICATION_OCTET_STREAM);
    match guess.type_() {
        mime::TEXT | mime::APPLICATION if guess.subtype() == mime::JAVASCRIPT => {
            "application/javascript; charset=utf-8".into()
        }
        mime::TEXT | mime::APPLICATION if guess.subtype() == mime::JSON => {
            "application/json; charset=utf-8".into()
        }
        mime::TEXT if guess.subtype() == mime::HTML => "text/html; charset=utf-8".into(),
        mime::TEXT if guess.subtype() == mime::CSS => "text/css; charset=utf-8".into(),
        _ => guess.essence_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_embedded_assets_with_content_type() {
        let (css, ct) = load("style.css").unwrap();
        assert!(!css.is_empty());
        assert_eq!(ct, "text/css; charset=utf-8");

        let (_, ct) = load("/app.js").unwrap();
        assert_eq!(ct, "application/javascript; charset=utf-8");
    }

    #[test]
    fn test_unknown_or_escaping_paths_are_not_found() {
        assert!(load("missing.css").is_none());
        assert!(load("").is_none());
        assert!(load("../Cargo.toml").is_none());
    }
}

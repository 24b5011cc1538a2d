use url::Url;

use crate::model::web::web_client::{WebClient, WebRequest};

pub const DEFAULT_BOARD_ICON: &[u8] = include_bytes!("../../../assets/board.png");

pub fn is_valid_image(buffer: &[u8]) -> bool {
    if buffer.is_empty() {
        return false;
    }

    return image::load_from_memory(buffer).is_ok();
}

/// Tries every candidate icon path against `base_url` in order and returns the first one
/// that downloads with status 200 and decodes as an image. Falls back to the bundled
/// board icon.
pub async fn get_fav_icon_buffer(
    client: &dyn WebClient,
    base_url: &str,
    icon_files: &[String]
) -> Vec<u8> {
    let base = Url::parse(base_url);
    if base.is_err() {
        warn!("get_fav_icon_buffer() can't parse base url \'{}\', using default icon", base_url);
        return DEFAULT_BOARD_ICON.to_vec();
    }

    let base = base.unwrap();
    if base.cannot_be_a_base() {
        warn!("get_fav_icon_buffer() '{}' can't be used as a base url, using default icon", base_url);
        return DEFAULT_BOARD_ICON.to_vec();
    }

    for icon_file in icon_files {
        let path = if icon_file.starts_with('/') {
            icon_file.clone()
        } else {
            format!("/{}", icon_file)
        };

        let mut url = base.clone();
        url.set_path(&path);

        if url.cannot_be_a_base() {
            warn!("get_fav_icon_buffer() invalid icon file setting \'{}\'", icon_file);
            continue;
        }

        debug!("get_fav_icon_buffer() looking for favicon at \'{}\'", url);

        let response = client.fetch(WebRequest::get(url.as_str()).allow_failure()).await;
        let response = match response {
            Ok(response) => response,
            Err(error) => {
                debug!("get_fav_icon_buffer() \'{}\' failed: {:#}", url, error);
                continue;
            }
        };

        if response.status == 200 && is_valid_image(&response.body) {
            debug!("get_fav_icon_buffer() found favicon at \'{}\'", url);
            return response.body;
        }
    }

    debug!("get_fav_icon_buffer() using default board icon for \'{}\'", base_url);
    return DEFAULT_BOARD_ICON.to_vec();
}

#[test]
fn test_default_icon_is_a_valid_image() {
    assert!(is_valid_image(DEFAULT_BOARD_ICON));
    assert!(!is_valid_image(b"<html>404</html>"));
    assert!(!is_valid_image(&[]));
}

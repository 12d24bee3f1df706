//! Browser texture loader backed by `HtmlImageElement`.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use voyage_core::{LoadError, TextureLoader};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

/// Loads images through the browser and waits for them to be decoded, so the
/// first draw never stalls on decoding.
#[derive(Debug, Default)]
pub struct HtmlImageLoader;

impl TextureLoader for HtmlImageLoader {
    type Texture = HtmlImageElement;

    fn load(&self, path: &str) -> LocalBoxFuture<'static, Result<HtmlImageElement, LoadError>> {
        let path = path.to_string();
        async move {
            let image = HtmlImageElement::new().map_err(|e| LoadError::Fetch {
                path: path.clone(),
                reason: format!("{e:?}"),
            })?;
            image.set_src(&path);

            // decode() rejects for network errors and for broken images alike
            JsFuture::from(image.decode())
                .await
                .map_err(|e| LoadError::Decode {
                    path: path.clone(),
                    reason: format!("{e:?}"),
                })?;

            if image.natural_width() == 0 {
                return Err(LoadError::Decode {
                    path,
                    reason: "image has no pixels".to_string(),
                });
            }
            Ok(image)
        }
        .boxed_local()
    }

    fn release(&self, image: HtmlImageElement) {
        // Dropping the source lets the browser evict the decoded bitmap.
        image.set_src("");
    }
}

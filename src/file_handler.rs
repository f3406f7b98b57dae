use crate::error::CanvasResult;
use crate::export::ExportedImage;

/// Hand an exported image to the user: written to the working directory on
/// desktop, downloaded by the browser on the web. Returns where it went.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_export(image: &ExportedImage) -> CanvasResult<String> {
    let path = std::path::Path::new(image.file_name());
    std::fs::write(path, &image.bytes).map_err(|source| crate::error::CanvasError::Save {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("Saved {}", path.display());
    Ok(path.display().to_string())
}

#[cfg(target_arch = "wasm32")]
pub fn save_export(image: &ExportedImage) -> CanvasResult<String> {
    use wasm_bindgen::JsCast;

    use crate::error::CanvasError;

    let failed = |what: &str| CanvasError::Download(what.to_owned());
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| failed("no document"))?;

    let bytes = js_sys::Uint8Array::from(image.bytes.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&bytes);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(image.format.mime_type());
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|_| failed("could not create blob"))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|_| failed("could not create URL"))?;

    let anchor = document
        .create_element("a")
        .map_err(|_| failed("could not create link"))?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| failed("could not create link"))?;
    anchor.set_href(&url);
    anchor.set_download(image.file_name());
    anchor.click();
    web_sys::Url::revoke_object_url(&url).ok();

    log::info!("Downloaded {}", image.file_name());
    Ok(image.file_name().to_owned())
}

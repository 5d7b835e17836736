//! Public-id derivation from provider-issued secure URLs.

/// Derives the provider-internal public id from a secure URL.
///
/// The provider's public URL format embeds
/// `.../upload/v<digits>/<folder>/<file>.<ext>`; the id used to address
/// the file server-side is `<folder>/<file>` without the extension,
/// where `<folder>` may itself contain further path segments.
///
/// Returns `None` when the URL carries no `upload` marker or too few
/// segments after it. Callers must treat `None` as "nothing addressable
/// to delete", not as an error.
#[must_use]
pub fn extract_public_id(url: &str) -> Option<String> {
    // Drop query string and fragment; they are not part of the path.
    let path_end = url.find(['?', '#']).unwrap_or(url.len());
    let path = &url[..path_end];

    // Skip the scheme and authority when present; the marker search below
    // only matches path segments.
    let path = path.split_once("://").map_or(path, |(_, rest)| rest);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let upload_index = segments
        .iter()
        .position(|s| s.eq_ignore_ascii_case("upload"))?;

    // At least the version segment (`v<digits>`) and one id segment must
    // follow the marker.
    if upload_index + 2 >= segments.len() {
        return None;
    }

    let joined = segments[upload_index + 2..].join("/");
    Some(strip_extension(&joined))
}

/// Removes the trailing file extension from the last path component.
fn strip_extension(path: &str) -> String {
    let last_slash = path.rfind('/').map_or(0, |i| i + 1);
    match path[last_slash..].rfind('.') {
        Some(dot) => path[..last_slash + dot].to_string(),
        None => path.to_string(),
    }
}

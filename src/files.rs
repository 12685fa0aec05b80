use crate::config;
use crate::mime;
use crate::response::{self, FullBody};
use hyper::{Response, StatusCode, Uri};
use std::io;
use std::path::{Path, PathBuf};

pub async fn respond(uri: &Uri, root: &Path) -> Response<FullBody> {
    let decoded = percent_decode(uri.path());
    let local = resolve(root, &decoded);

    let meta = match tokio::fs::metadata(&local).await {
        Ok(meta) => meta,
        Err(e) => return error_response(&local, &e),
    };

    if meta.is_dir() {
        // Match the usual static-server behavior: directories are only served
        // at their slash-terminated path.
        if !decoded.ends_with('/') {
            return response::redirect(&format!("{}/", uri.path()));
        }
        for index in config::INDEX_FILES {
            let candidate = local.join(index);
            match tokio::fs::read(&candidate).await {
                Ok(bytes) => {
                    log::debug!("{} -> {}", uri, candidate.display());
                    return response::file(bytes, mime::content_type(extension(index)));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return error_response(&candidate, &e),
            }
        }
        return match listing(&local, &decoded).await {
            Ok(page) => response::html(StatusCode::OK, page),
            Err(e) => error_response(&local, &e),
        };
    }

    match tokio::fs::read(&local).await {
        Ok(bytes) => {
            log::debug!("{} -> {}", uri, local.display());
            response::file(bytes, mime::content_type(extension(&decoded)))
        }
        Err(e) => error_response(&local, &e),
    }
}

fn error_response(path: &Path, e: &io::Error) -> Response<FullBody> {
    if e.kind() == io::ErrorKind::NotFound {
        log::debug!("{} -> [not found]", path.display());
        response::text(StatusCode::NOT_FOUND, "404 Not Found\n")
    } else {
        log::warn!("{} -> [file error] {}", path.display(), e);
        response::text(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error\n")
    }
}

/// Resolve a URL path against the document root, lexically. `..` pops at most
/// to the root, so no request path can name anything outside it.
fn resolve(root: &Path, url_path: &str) -> PathBuf {
    let mut parts: Vec<&str> = Vec::new();
    for segment in url_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    let mut local = root.to_path_buf();
    local.extend(parts);
    local
}

fn extension(path: &str) -> Option<&str> {
    Path::new(path).extension().and_then(|e| e.to_str())
}

/// Minimal `%XX` decoding; malformed escapes are passed through untouched.
fn percent_decode(path: &str) -> String {
    fn hex(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

async fn listing(dir: &Path, url_path: &str) -> Result<String, io::Error> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await?.is_dir() {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    let items = names
        .iter()
        .map(|name| format!("<li><a href=\"{name}\">{name}</a></li>"))
        .collect::<String>();
    Ok(format!(
        concat!(
            "<!DOCTYPE html>",
            "<html>",
            "<head><title>Directory listing for {path}</title></head>",
            "<body>",
            "<h1>Directory listing for {path}</h1>",
            "<ul>{items}</ul>",
            "</body>",
            "</html>",
        ),
        path = url_path,
        items = items
    ))
}

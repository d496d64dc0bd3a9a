//! Zip export of a finished campaign.
//!
//! One archive per request, written to `<public_dir>/outputs/larisin-<uuid>.zip`:
//!
//! ```text
//! captions.json      pretty JSON of the captions, as sent
//! plan.json          pretty JSON of the posting plan, as sent
//! captions.txt       human-readable transcript, one section per platform
//! assets/<file>      every listed asset that resolves inside the public root
//! ```
//!
//! Asset paths come from the caller, so each is re-resolved against the
//! canonical public root before it is opened. Paths that are missing, escape
//! the root (including through symlinks), are not regular files, or repeat
//! an already-added file name are skipped with a debug log. The archive is
//! finished and fsynced before its URL is handed back.

use crate::naming;
use crate::types::{CaptionBundle, CaptionVariant, null_as_default};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// What to pack. `captions` and `plan` are kept as arbitrary JSON so the
/// archive carries exactly what the client holds; only the transcript reads
/// captions through [`caption_view`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportRequest {
    pub captions: Value,
    pub plan: Value,
    #[serde(deserialize_with = "null_as_default")]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedArchive {
    #[serde(skip)]
    pub path: PathBuf,
    pub url: String,
    /// Archive names of the assets that made it in.
    pub assets: Vec<String>,
}

/// Resolve a public URL path like `/outputs/x.png` to a file inside `public_root`.
///
/// `public_root` must already be canonical. Leading `/`, `.`, `..` and root
/// components are dropped before joining, and the joined path is
/// canonicalized again so symlinks cannot lead outside the root.
pub fn resolve_public_path(public_root: &Path, requested: &str) -> Option<PathBuf> {
    let relative: PathBuf = Path::new(requested.trim_start_matches('/'))
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();
    if relative.as_os_str().is_empty() {
        return None;
    }

    let resolved = public_root.join(relative).canonicalize().ok()?;
    (resolved.starts_with(public_root) && resolved.is_file()).then_some(resolved)
}

/// Typed reading of client-held captions, in the client's key order.
///
/// Anything that isn't a platform-to-list object reads as empty; list items
/// that aren't variant objects read as blank variants.
pub fn caption_view(captions: &Value) -> CaptionBundle {
    let Some(platforms) = captions.as_object() else {
        return CaptionBundle::new();
    };
    platforms
        .iter()
        .map(|(platform, variants)| {
            let variants = variants
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .map(|item| CaptionVariant::deserialize(item).unwrap_or_default())
                        .collect()
                })
                .unwrap_or_default();
            (platform.clone(), variants)
        })
        .collect()
}

/// Plain-text transcript of every platform's variants.
pub fn captions_transcript(captions: &CaptionBundle) -> String {
    let mut out = String::new();
    for (platform, variants) in captions {
        out.push_str(&format!("\n==== {} ====\n", platform.to_uppercase()));
        for (i, variant) in variants.iter().enumerate() {
            out.push_str(&format!(
                "\n[Varian {}]\n{}\n# {}\n",
                i + 1,
                variant.caption,
                variant.hashtags.join(" ")
            ));
        }
    }
    out
}

/// Write the archive for `request` into `outputs_dir`.
///
/// A partially written archive is removed when any step fails.
pub fn write_archive(
    request: &ExportRequest,
    public_root: &Path,
    outputs_dir: &Path,
) -> Result<ExportedArchive, ExportError> {
    fs::create_dir_all(outputs_dir)?;
    let public_root = public_root.canonicalize()?;

    let file_name = naming::archive_file_name();
    let path = outputs_dir.join(&file_name);

    match pack(request, &public_root, &path) {
        Ok(assets) => {
            tracing::info!(file = %file_name, assets = assets.len(), "archive written");
            Ok(ExportedArchive {
                path,
                url: naming::public_url(&file_name),
                assets,
            })
        }
        Err(e) => {
            let _ = fs::remove_file(&path);
            Err(e)
        }
    }
}

fn pack(
    request: &ExportRequest,
    public_root: &Path,
    path: &Path,
) -> Result<Vec<String>, ExportError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));
    let mut zip = ZipWriter::new(File::create(path)?);

    let empty = Value::Object(Map::new());
    let captions = if request.captions.is_null() {
        &empty
    } else {
        &request.captions
    };
    zip.start_file("captions.json", options)?;
    zip.write_all(serde_json::to_string_pretty(captions)?.as_bytes())?;

    zip.start_file("plan.json", options)?;
    zip.write_all(serde_json::to_string_pretty(&request.plan)?.as_bytes())?;

    zip.start_file("captions.txt", options)?;
    zip.write_all(captions_transcript(&caption_view(&request.captions)).as_bytes())?;

    let mut seen = HashSet::new();
    let mut assets = Vec::new();
    for requested in &request.files {
        let Some(source) = resolve_public_path(public_root, requested) else {
            tracing::debug!(path = %requested, "export: skipping unresolvable asset");
            continue;
        };
        let Some(base) = source.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !seen.insert(base.to_string()) {
            tracing::debug!(path = %requested, "export: skipping duplicate file name");
            continue;
        }

        let entry = format!("assets/{base}");
        zip.start_file(entry.as_str(), options)?;
        io::copy(&mut File::open(&source)?, &mut zip)?;
        assets.push(entry);
    }

    let file = zip.finish()?;
    file.sync_all()?;
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Read;
    use tempfile::TempDir;

    struct Public {
        _tmp: TempDir,
        root: PathBuf,
        outputs: PathBuf,
    }

    fn public_dir() -> Public {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("public");
        let outputs = root.join("outputs");
        fs::create_dir_all(&outputs).unwrap();
        Public {
            _tmp: tmp,
            root,
            outputs,
        }
    }

    fn bundle() -> CaptionBundle {
        let mut captions = CaptionBundle::new();
        captions.insert(
            "instagram".into(),
            vec![
                CaptionVariant {
                    caption: "Pagi lebih manis".into(),
                    hashtags: vec!["#kopi".into(), "#gulaaren".into()],
                },
                CaptionVariant::raw("Varian kedua"),
            ],
        );
        captions.insert("whatsapp".into(), vec![CaptionVariant::raw("Halo!")]);
        captions
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        archive.file_names().map(String::from).collect()
    }

    fn read_entry(path: &Path, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut out = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn transcript_format() {
        let text = captions_transcript(&bundle());
        assert_eq!(
            text,
            "\n==== INSTAGRAM ====\n\
             \n[Varian 1]\nPagi lebih manis\n# #kopi #gulaaren\n\
             \n[Varian 2]\nVarian kedua\n# \n\
             \n==== WHATSAPP ====\n\
             \n[Varian 1]\nHalo!\n# \n"
        );
    }

    #[test]
    fn transcript_of_empty_bundle_is_empty() {
        assert_eq!(captions_transcript(&CaptionBundle::new()), "");
    }

    #[test]
    fn includes_existing_and_skips_missing() {
        let public = public_dir();
        fs::write(public.outputs.join("x.png"), b"png").unwrap();

        let request = ExportRequest {
            captions: serde_json::to_value(bundle()).unwrap(),
            plan: json!([]),
            files: vec!["/outputs/x.png".into(), "/outputs/missing.png".into()],
        };
        let archive = write_archive(&request, &public.root, &public.outputs).unwrap();

        assert!(archive.url.starts_with("/outputs/larisin-"));
        assert!(archive.url.ends_with(".zip"));
        assert!(archive.path.starts_with(&public.outputs));
        assert_eq!(archive.assets, vec!["assets/x.png"]);

        let names = entry_names(&archive.path);
        assert!(names.contains(&"captions.json".to_string()));
        assert!(names.contains(&"plan.json".to_string()));
        assert!(names.contains(&"captions.txt".to_string()));
        assert!(names.contains(&"assets/x.png".to_string()));
        assert!(!names.iter().any(|n| n.contains("missing")));
    }

    #[test]
    fn json_entries_are_pretty() {
        let public = public_dir();
        let request = ExportRequest {
            captions: serde_json::to_value(bundle()).unwrap(),
            plan: json!([{"date": "Jumat, 16 Okt"}]),
            files: vec![],
        };
        let archive = write_archive(&request, &public.root, &public.outputs).unwrap();

        let captions = read_entry(&archive.path, "captions.json");
        assert!(captions.contains("\n  \"instagram\": ["));
        let parsed: CaptionBundle = serde_json::from_str(&captions).unwrap();
        assert_eq!(parsed, bundle());

        let plan: serde_json::Value =
            serde_json::from_str(&read_entry(&archive.path, "plan.json")).unwrap();
        assert_eq!(plan[0]["date"], "Jumat, 16 Okt");

        assert!(read_entry(&archive.path, "captions.txt").contains("==== WHATSAPP ===="));
    }

    #[test]
    fn traversal_is_contained() {
        let public = public_dir();
        let outside = public._tmp.path().join("secret.txt");
        fs::write(&outside, b"secret").unwrap();

        let request = ExportRequest {
            files: vec![
                "../../etc/passwd".into(),
                "/../secret.txt".into(),
                "../secret.txt".into(),
            ],
            ..Default::default()
        };
        let archive = write_archive(&request, &public.root, &public.outputs).unwrap();

        assert!(archive.assets.is_empty());
        let names = entry_names(&archive.path);
        assert!(!names.iter().any(|n| n.starts_with("assets/")));
    }

    #[test]
    fn dot_segments_are_stripped_not_followed() {
        let public = public_dir();
        fs::write(public.outputs.join("x.png"), b"png").unwrap();
        let root = public.root.canonicalize().unwrap();

        assert_eq!(
            resolve_public_path(&root, "/../outputs/./x.png"),
            Some(root.join("outputs").join("x.png"))
        );
        assert_eq!(resolve_public_path(&root, "/"), None);
        assert_eq!(resolve_public_path(&root, ""), None);
        assert_eq!(resolve_public_path(&root, "/outputs"), None);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_out_of_root_is_skipped() {
        let public = public_dir();
        let outside = public._tmp.path().join("secret.txt");
        fs::write(&outside, b"secret").unwrap();
        std::os::unix::fs::symlink(&outside, public.outputs.join("link.png")).unwrap();

        let root = public.root.canonicalize().unwrap();
        assert_eq!(resolve_public_path(&root, "/outputs/link.png"), None);
    }

    #[test]
    fn duplicate_basenames_are_added_once() {
        let public = public_dir();
        fs::create_dir_all(public.root.join("img")).unwrap();
        fs::write(public.outputs.join("a.png"), b"one").unwrap();
        fs::write(public.root.join("img").join("a.png"), b"two").unwrap();

        let request = ExportRequest {
            files: vec![
                "/outputs/a.png".into(),
                "/img/a.png".into(),
                "/outputs/a.png".into(),
            ],
            ..Default::default()
        };
        let archive = write_archive(&request, &public.root, &public.outputs).unwrap();

        assert_eq!(archive.assets, vec!["assets/a.png"]);
        assert_eq!(read_entry(&archive.path, "assets/a.png"), "one");
    }

    #[test]
    fn request_fields_default() {
        let request: ExportRequest = serde_json::from_str("{}").unwrap();
        assert!(request.captions.is_null());
        assert!(request.plan.is_null());
        assert!(request.files.is_empty());
    }

    #[test]
    fn each_export_gets_its_own_file() {
        let public = public_dir();
        let a = write_archive(&ExportRequest::default(), &public.root, &public.outputs).unwrap();
        let b = write_archive(&ExportRequest::default(), &public.root, &public.outputs).unwrap();
        assert_ne!(a.path, b.path);
        assert!(a.path.is_file() && b.path.is_file());
    }

    #[test]
    fn null_files_read_as_empty() {
        let request: ExportRequest = serde_json::from_str(r#"{"files":null}"#).unwrap();
        assert!(request.files.is_empty());
    }

    #[test]
    fn captions_json_keeps_what_the_client_sent() {
        let public = public_dir();
        let captions = json!({
            "whatsapp": [{"caption": "Halo!", "hashtags": ["#kopi", 7], "cta": "Chat kami"}],
            "instagram": [{"caption": "Pagi lebih manis", "hashtags": []}],
        });
        let request = ExportRequest {
            captions: captions.clone(),
            ..Default::default()
        };
        let archive = write_archive(&request, &public.root, &public.outputs).unwrap();

        let written: Value =
            serde_json::from_str(&read_entry(&archive.path, "captions.json")).unwrap();
        assert_eq!(written, captions);
        assert_eq!(written["whatsapp"][0]["cta"], "Chat kami");
        assert_eq!(written["whatsapp"][0]["hashtags"][1], 7);

        let text = read_entry(&archive.path, "captions.txt");
        assert!(text.find("==== WHATSAPP ====").unwrap() < text.find("==== INSTAGRAM ====").unwrap());
        assert!(text.contains("\nHalo!\n# #kopi\n"));
    }

    #[test]
    fn caption_view_is_lenient() {
        let view = caption_view(&json!({
            "instagram": ["teks lepas", {"caption": "ok", "hashtags": ["#a"]}],
            "tiktok": "bukan daftar",
        }));
        assert_eq!(view["instagram"][0], CaptionVariant::default());
        assert_eq!(view["instagram"][1].hashtags, vec!["#a"]);
        assert!(view["tiktok"].is_empty());
        assert!(caption_view(&json!([1, 2])).is_empty());
    }

    #[test]
    fn missing_captions_are_an_empty_object() {
        let public = public_dir();
        let archive = write_archive(&ExportRequest::default(), &public.root, &public.outputs).unwrap();
        assert_eq!(read_entry(&archive.path, "captions.json"), "{}");
    }
}

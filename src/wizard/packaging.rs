//! Checklist packaging: approved uploads grouped by category into one ZIP.
//!
//! Layout is `{category label}/{original file name}` with no directory
//! entries and no manifest. The archive is built in memory; `Package::save_to`
//! writes it out.

use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::types::{Documento, DocumentoEstado};

const FALLBACK_PACKAGE_NAME: &str = "Documentos";

#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("No hay documentos cargados para descargar")]
    NothingToPackage,

    #[error("Error al generar el archivo ZIP")]
    Zip(#[from] zip::result::ZipError),

    #[error("Error al generar el archivo ZIP")]
    Write(#[from] std::io::Error),

    #[error("No se pudo guardar el archivo en {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file picked for one checklist document. Held in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its final path component as name.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "archivo".to_string());
        Ok(Self { name, bytes })
    }

    /// Lowercased extension without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    /// Name as stored inside the archive: directory parts are dropped.
    fn entry_name(&self) -> String {
        let trimmed = self.name.rsplit(['/', '\\']).next().unwrap_or_default();
        if trimmed.is_empty() {
            "archivo".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// A built archive ready to be written.
#[derive(Debug, Clone)]
pub struct Package {
    pub file_name: String,
    pub entries: Vec<String>,
    pub bytes: Vec<u8>,
}

impl Package {
    /// Write the archive into `dir` and return the full path.
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf, PackagingError> {
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|source| PackagingError::Save {
                path: path.clone(),
                source,
            })?;
        log::info!(
            "Saved checklist package {} ({} entries, {} bytes)",
            path.display(),
            self.entries.len(),
            self.bytes.len()
        );
        Ok(path)
    }
}

/// Where packages go when the caller does not pick a directory.
pub fn default_output_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `{tenderName}_{YYYY-MM-DD}.zip`, with path separators in the tender name
/// replaced so the result is always a single file name.
pub fn package_file_name(tender_name: &str, date: NaiveDate) -> String {
    let base = if tender_name.trim().is_empty() {
        FALLBACK_PACKAGE_NAME.to_string()
    } else {
        tender_name.replace(['/', '\\'], "-")
    };
    format!("{}_{}.zip", base, date.format("%Y-%m-%d"))
}

/// Archive path to file for every approved document with an upload.
/// When two documents map to the same path the later one wins.
pub fn select_entries<'a>(
    documentos: &[Documento],
    files: &'a HashMap<String, UploadedFile>,
) -> BTreeMap<String, &'a UploadedFile> {
    let mut entries = BTreeMap::new();
    for doc in documentos {
        if doc.estado != DocumentoEstado::Aprobado {
            continue;
        }
        let Some(file) = files.get(&doc.id) else {
            continue;
        };
        let path = format!("{}/{}", doc.categoria.label(), file.entry_name());
        if entries.insert(path.clone(), file).is_some() {
            log::warn!("Duplicate package entry {}, keeping the later upload", path);
        }
    }
    entries
}

pub fn build_zip(entries: &BTreeMap<String, &UploadedFile>) -> Result<Vec<u8>, PackagingError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, file) in entries {
        zip.start_file(path.as_str(), options)?;
        zip.write_all(&file.bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}

pub fn build_package(
    tender_name: &str,
    documentos: &[Documento],
    files: &HashMap<String, UploadedFile>,
    date: NaiveDate,
) -> Result<Package, PackagingError> {
    let entries = select_entries(documentos, files);
    if entries.is_empty() {
        return Err(PackagingError::NothingToPackage);
    }

    let bytes = build_zip(&entries).map_err(|e| {
        log::error!("ZIP generation failed: {:?}", e);
        e
    })?;

    Ok(Package {
        file_name: package_file_name(tender_name, date),
        entries: entries.into_keys().collect(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentoCategoria;
    use std::io::Read;

    fn doc(id: &str, categoria: DocumentoCategoria, estado: DocumentoEstado) -> Documento {
        Documento {
            id: id.to_string(),
            nombre: format!("Doc {}", id),
            categoria,
            estado,
            observaciones: None,
            fecha_carga: None,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 14).unwrap()
    }

    #[test]
    fn test_package_groups_by_category_label() {
        let documentos = vec![
            doc("A", DocumentoCategoria::Juridico, DocumentoEstado::Aprobado),
            doc("B", DocumentoCategoria::Tecnico, DocumentoEstado::Aprobado),
        ];
        let mut files = HashMap::new();
        files.insert("A".to_string(), UploadedFile::new("a.pdf", b"AAA".to_vec()));
        files.insert("B".to_string(), UploadedFile::new("b.pdf", b"BB".to_vec()));

        let package = build_package("Obra Norte", &documentos, &files, date()).unwrap();
        assert_eq!(package.file_name, "Obra Norte_2026-02-14.zip");

        let mut archive = zip::ZipArchive::new(Cursor::new(package.bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["Jurídico/a.pdf", "Técnico/b.pdf"]);

        let mut content = String::new();
        archive
            .by_name("Jurídico/a.pdf")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "AAA");
    }

    #[test]
    fn test_unapproved_and_missing_files_are_skipped() {
        let documentos = vec![
            doc("A", DocumentoCategoria::Fiscal, DocumentoEstado::Pendiente),
            doc("B", DocumentoCategoria::Oferta, DocumentoEstado::Aprobado),
            doc("C", DocumentoCategoria::Otro, DocumentoEstado::Aprobado),
        ];
        let mut files = HashMap::new();
        files.insert("A".to_string(), UploadedFile::new("a.pdf", b"A".to_vec()));
        files.insert("C".to_string(), UploadedFile::new("c.png", b"C".to_vec()));

        let entries = select_entries(&documentos, &files);
        let paths: Vec<&String> = entries.keys().collect();
        assert_eq!(paths, vec!["Otros/c.png"]);
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let documentos = vec![doc("A", DocumentoCategoria::Fiscal, DocumentoEstado::Aprobado)];
        let err = build_package("X", &documentos, &HashMap::new(), date()).unwrap_err();
        assert!(matches!(err, PackagingError::NothingToPackage));
        assert_eq!(err.to_string(), "No hay documentos cargados para descargar");
    }

    #[test]
    fn test_file_name_fallbacks() {
        assert_eq!(package_file_name("", date()), "Documentos_2026-02-14.zip");
        assert_eq!(
            package_file_name("Obra 1/2", date()),
            "Obra 1-2_2026-02-14.zip"
        );
    }

    #[test]
    fn test_entry_name_drops_directories() {
        let file = UploadedFile::new("C:\\docs\\rut.PDF", b"x".to_vec());
        assert_eq!(file.entry_name(), "rut.PDF");
        assert_eq!(file.extension().as_deref(), Some("pdf"));
    }

    #[tokio::test]
    async fn test_save_to_writes_archive() {
        let dir = tempfile::TempDir::new().unwrap();
        let documentos = vec![doc("A", DocumentoCategoria::Juridico, DocumentoEstado::Aprobado)];
        let mut files = HashMap::new();
        files.insert("A".to_string(), UploadedFile::new("rup.pdf", b"%PDF".to_vec()));

        let package = build_package("LIC", &documentos, &files, date()).unwrap();
        let path = package.save_to(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("LIC_2026-02-14.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), package.bytes);
    }
}

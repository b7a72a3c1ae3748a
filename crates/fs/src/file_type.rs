use std::path::Path;

use serde::{Deserialize, Serialize};

pub const UNKNOWN_EXTENSION: &str = "unknown";
pub const UNKNOWN_DESCRIPTION: &str = "unknown file type";

/// Known extensions (with leading dot) and their descriptions.
/// Lookups are exact and case-sensitive.
pub const FILE_EXTENSIONS: &[(&str, &str)] = &[
    (".txt", "Text File"),
    (".jpg", "Image File"),
    (".png", "Image File"),
    (".mp4", "Video File"),
    (".mp3", "Audio File"),
    (".pdf", "PDF Document"),
    (".docx", "Word Document"),
    (".xlsx", "Excel Spreadsheet"),
    (".pptx", "PowerPoint Presentation"),
    (".eml", "Email File"),
    (".msg", "Email File"),
    (".csv", "CSV File"),
    (".html", "HTML File"),
    (".css", "CSS File"),
    (".js", "JavaScript File"),
    (".py", "Python File"),
    (".rtf", "RTF Document"),
    (".exe", "Windows Executable File"),
    (".apk", "Android Package File"),
    (".zip", "ZIP Archive"),
    (".tar", "TAR Archive"),
    (".gz", "GZIP Archive"),
    (".bz2", "BZIP2 Archive"),
    (".7z", "7-Zip Archive"),
    (".rar", "RAR Archive"),
    (".iso", "ISO Image File"),
    (".dmg", "Disk Image File"),
    (".dll", "Dynamic Link Library"),
    (".so", "Shared Object File"),
    (".class", "Java Class File"),
    (".jar", "Java Archive File"),
    (".go", "Go Source File"),
    (".sh", "Shell Script"),
    (".bat", "Batch File"),
    (".ps1", "PowerShell Script"),
    (".json", "JSON File"),
    (".xml", "XML File"),
    (".yaml", "YAML File"),
    (".yml", "YAML File"),
    (".svg", "SVG File"),
    (".woff", "Web Open Font Format"),
    (".woff2", "Web Open Font Format 2"),
    (".ttf", "TrueType Font"),
    (".otf", "OpenType Font"),
    (".eot", "Embedded OpenType Font"),
    (".fnt", "Bitmap Font"),
    (".ttc", "TrueType Collection"),
    (".pdb", "Program Database File"),
    (".mdb", "Microsoft Access Database"),
    (".sqlite", "SQLite Database"),
    (".db", "Database File"),
    (".log", "Log File"),
    (".tmp", "Temporary File"),
    (".bak", "Backup File"),
    (".swp", "Swap File"),
    (".swo", "Swap File"),
    (".lock", "Lock File"),
    (".pid", "Process ID File"),
    (".seed", "Seed File"),
    (".key", "Key File"),
    (".pem", "Privacy Enhanced Mail File"),
    (".crt", "Certificate File"),
    (".cer", "Certificate File"),
    (".csr", "Certificate Signing Request"),
    (".p12", "PKCS#12 File"),
    (".pfx", "PKCS#12 File"),
    (".p7b", "PKCS#7 Certificate File"),
    (".p7c", "PKCS#7 Certificate File"),
    (".p7s", "PKCS#7 Signature File"),
    (".p8", "PKCS#8 Private Key File"),
    (".jks", "Java KeyStore File"),
    (".jceks", "Java Cryptography Extension KeyStore File"),
];

/// Extension-based classification of a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileType {
    pub extension: String,
    pub description: String,
}

impl FileType {
    pub fn unknown() -> Self {
        Self {
            extension: UNKNOWN_EXTENSION.to_owned(),
            description: UNKNOWN_DESCRIPTION.to_owned(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.extension == UNKNOWN_EXTENSION
    }
}

/// Suffix of the final path component starting at its last `.`.
///
/// A name made only of a leading dot part (`.bashrc`) is its own extension.
pub fn extension_of(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.rfind('.').map(|idx| &name[idx..])
}

/// Look up the description for an exact extension such as `.pdf`.
pub fn describe(extension: &str) -> Option<&'static str> {
    FILE_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, desc)| *desc)
}

/// Classify `path` by its extension. Never fails: anything not in
/// [`FILE_EXTENSIONS`] is [`FileType::unknown`].
pub fn classify(path: &Path) -> FileType {
    match extension_of(path).and_then(|ext| describe(ext).map(|desc| (ext, desc))) {
        Some((ext, desc)) => FileType {
            extension: ext.to_owned(),
            description: desc.to_owned(),
        },
        None => FileType::unknown(),
    }
}

#[cfg(test)]
#[path = "file_type_tests.rs"]
mod tests;

//! Namespace URIs recognized in OEB/OPF package documents.

/// Dublin Core element set, matched as a prefix so `1.1/` and later
/// revisions are accepted.
pub const DUBLIN_CORE_PREFIX: &str = "http://purl.org/dc/elements";

/// Dublin Core URI used by OEB 1.x documents, matched as a prefix.
pub const DUBLIN_CORE_LEGACY_PREFIX: &str = "http://purl.org/metadata/dublin_core";

/// Open Packaging Format, matched exactly.
pub const OPEN_PACKAGING_FORMAT: &str = "http://www.idpf.org/2007/opf";

pub fn is_dublin_core(uri: &str) -> bool {
    uri.starts_with(DUBLIN_CORE_PREFIX) || uri.starts_with(DUBLIN_CORE_LEGACY_PREFIX)
}

pub fn is_open_packaging_format(uri: &str) -> bool {
    uri == OPEN_PACKAGING_FORMAT
}

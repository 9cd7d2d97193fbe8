//! Conversion of PDF files into named images.

use std::path::{Path, PathBuf};

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::document::{PDFDocument, PDFPage};
use crate::error::{GenError, Result};
use crate::image::{Image, ImageName};
use crate::interp::interpret;
use crate::resources::{FormRegistry, Resources};
use crate::route::DrawRoute;

pub(crate) fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Options for converting input files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Turn each page of a multi-page document into its own image instead
    /// of rejecting the document.
    pub split_pages: bool,
    /// Worker threads. None uses one per available core.
    pub threads: Option<usize>,
}

/// Interpret one page, with the forms it draws registered as sub-routes.
pub fn page_route(doc: &PDFDocument, page: &PDFPage) -> Result<DrawRoute> {
    let mut forms = FormRegistry::new();
    let resources = Resources::resolve(doc, &page.resources, &mut forms)?;
    interpret(&page.contents, &resources, page.mediabox, forms.into_arena())
}

/// Images of an in-memory PDF. `file` names the source for image names
/// and error messages.
pub fn images_from_bytes(
    data: Vec<u8>,
    file: &Path,
    options: &ConvertOptions,
) -> Result<Vec<Image>> {
    let doc = PDFDocument::new(data)?;
    let pages = PDFPage::create_pages(&doc)?;
    if pages.is_empty() {
        return Err(GenError::NoPages);
    }
    if pages.len() > 1 && !options.split_pages {
        return Err(GenError::MultiPageNotSupported {
            file: file.to_path_buf(),
            pages: pages.len(),
        });
    }

    let name = ImageName::from_path(file);
    pages
        .iter()
        .enumerate()
        .map(|(index, page)| {
            debug!(page = index, objid = ?page.pageid, "interpreting page");
            Ok(Image::new(name.for_page(index), page_route(&doc, page)?))
        })
        .collect()
}

/// Read and convert one file.
pub fn images_from_file(path: &Path, options: &ConvertOptions) -> Result<Vec<Image>> {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(GenError::UnsupportedFileExtension(path.to_path_buf()));
    }
    let data = std::fs::read(path).map_err(|e| GenError::from(e).in_file(path))?;
    let images = images_from_bytes(data, path, options).map_err(|e| e.in_file(path))?;
    info!(file = %path.display(), images = images.len(), "converted");
    Ok(images)
}

/// Convert every file in parallel. Images are returned in input order,
/// pages ascending; the first failure aborts the run.
pub fn generate_images(paths: &[PathBuf], options: &ConvertOptions) -> Result<Vec<Image>> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(options.threads.unwrap_or_else(default_thread_count))
        .build()
        .map_err(|e| GenError::ThreadPool(e.to_string()))?;

    let mut results: Vec<(usize, Result<Vec<Image>>)> = pool.install(|| {
        paths
            .par_iter()
            .enumerate()
            .map(|(index, path)| (index, images_from_file(path, options)))
            .collect()
    });

    results.sort_by_key(|(index, _)| *index);
    let mut images = Vec::new();
    for (_, result) in results {
        images.extend(result?);
    }
    Ok(images)
}

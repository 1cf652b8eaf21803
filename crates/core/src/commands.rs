//! File-level operations behind the `init`, `convert` and `export` commands.
//!
//! Formats are chosen from file extensions here and nowhere else. Output files are written
//! only after everything they depend on has succeeded, so a failed command never leaves a
//! half-written file behind.

use crate::config::{resolve_template_path, CoreConfig};
use crate::constants::EXPORT_EXTENSIONS;
use crate::render::render;
use crate::{CoreError, CoreResult};
use fodder_types::DataFormat;
use resume_data::{Resume, CURRENT_SCHEMA_VERSION};
use std::path::Path;

/// Blank résumé text for hand-editing.
///
/// Every list holds one empty placeholder entry so the file shows the full structure.
pub fn init_text(format: DataFormat) -> CoreResult<String> {
    Ok(resume_data::to_string(&Resume::new(), format)?)
}

/// Write a blank résumé to `path`, in the format named by its extension.
pub fn init_file(path: &Path) -> CoreResult<()> {
    let format = DataFormat::from_path(path)?;
    let text = init_text(format)?;
    write_file(path, text.as_bytes())?;
    tracing::info!("wrote blank {} resume to {}", format, path.display());
    Ok(())
}

/// Re-encode a résumé file in another format.
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` if both paths name the same format.
pub fn convert_file(input: &Path, output: &Path) -> CoreResult<()> {
    let from = DataFormat::from_path(input)?;
    let to = DataFormat::from_path(output)?;
    if from == to {
        return Err(CoreError::InvalidInput(format!(
            "input and output are both {from}; nothing to convert"
        )));
    }

    let resume = read_resume(input, from)?;
    let bytes = resume_data::encode(&resume, to)?;
    write_file(output, &bytes)?;
    tracing::info!(
        "converted {} ({from}) to {} ({to})",
        input.display(),
        output.display()
    );
    Ok(())
}

/// Render a résumé through template text.
pub fn export_resume(resume: &Resume, template_text: &str) -> CoreResult<Vec<u8>> {
    render(resume, template_text)
}

/// Render a résumé file through a template into a Word document.
///
/// `template` defaults to the configured default template and is looked up with
/// [`resolve_template_path`]. The template and the output file must both end in `.doc` or
/// `.xml`.
///
/// # Errors
///
/// - `CoreError::InvalidInput` for an unsupported template or output extension, or a résumé
///   written by a newer schema version.
/// - `CoreError::TemplateNotFound` if the template cannot be located.
/// - Decode and render errors from the input and template.
pub fn export_file(
    config: &CoreConfig,
    input: &Path,
    output: &Path,
    template: Option<&Path>,
) -> CoreResult<()> {
    check_export_extension("export", output)?;

    let requested = template.unwrap_or_else(|| Path::new(config.default_template()));
    let template_path = resolve_template_path(config, requested)?;
    check_export_extension("template", &template_path)?;
    let template_text = std::fs::read_to_string(&template_path).map_err(|source| {
        CoreError::FileRead {
            path: template_path.clone(),
            source,
        }
    })?;

    let resume = read_resume(input, DataFormat::from_path(input)?)?;
    check_version(&resume)?;

    let bytes = export_resume(&resume, &template_text)?;
    write_file(output, &bytes)?;
    tracing::info!(
        "exported {} to {} using {}",
        input.display(),
        output.display(),
        template_path.display()
    );
    Ok(())
}

fn read_resume(path: &Path, format: DataFormat) -> CoreResult<Resume> {
    let bytes = std::fs::read(path).map_err(|source| CoreError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(resume_data::decode(&bytes, format)?)
}

fn write_file(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    std::fs::write(path, bytes).map_err(|source| CoreError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn check_export_extension(role: &str, path: &Path) -> CoreResult<()> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            EXPORT_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        });
    if supported {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "{role} file {} must end with .doc or .xml",
            path.display()
        )))
    }
}

/// Unversioned data predates the version field and is rendered as-is; data from a newer
/// schema is refused.
fn check_version(resume: &Resume) -> CoreResult<()> {
    if resume.is_supported_version() {
        return Ok(());
    }
    if resume.version == 0 {
        tracing::warn!("resume has no schema version; assuming version {CURRENT_SCHEMA_VERSION}");
        return Ok(());
    }
    Err(CoreError::InvalidInput(format!(
        "resume schema version {} is newer than supported version {CURRENT_SCHEMA_VERSION}",
        resume.version
    )))
}

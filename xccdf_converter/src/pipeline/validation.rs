use crate::tags::{XccdfTag, XCCDF_NAMESPACE};

/// Validate that the pipeline is properly configured
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating conversion pipeline configuration");

    crate::logging::config::validate_config()?;

    for tag in XccdfTag::ALL {
        if XccdfTag::classify(&tag.qualified_name()) != Some(tag) {
            return Err(format!("Tag vocabulary does not round-trip for <{}>", tag.local_name()));
        }
    }

    crate::output::resolve_encoding("utf-8").map_err(|e| e.to_string())?;

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Conversion pipeline validation succeeded",
        "namespace" => XCCDF_NAMESPACE,
        "tags" => XccdfTag::ALL.len(),
        "max_file_size" => crate::file_processor::get_max_file_size()
    );

    Ok(())
}

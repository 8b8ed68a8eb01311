/// Check that every stage's diagnostic codes are registered
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::file_processor::validate_file_processor_codes()?;
    crate::lexical::validate_tokenization()?;
    crate::automaton::validate_automaton_codes()?;
    crate::symbols::validate_symbol_codes()?;
    crate::conditional::validate_conditional_codes()?;

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => super::info::PIPELINE_STAGES.len()
    );

    Ok(())
}

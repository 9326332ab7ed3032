//! Subcommand implementations

use crate::file_submitter::FileSubmitter;
use dorm_wizard::config::RuntimeConfig;
use dorm_wizard::summary::Summary;
use dorm_wizard::validation::{ValidationOptions, ValidationReport, Validator};
use dorm_wizard::wizard::{step_fields, AdvanceOutcome, RegistrationWizard, WizardStep};
use dorm_wizard::RegistrationDraft;
use futures::executor::block_on;
use std::error::Error;
use std::path::Path;

pub fn load_draft(path: &Path) -> Result<RegistrationDraft, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let draft = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid draft in {}: {}", path.display(), e))?;
    Ok(draft)
}

/// Per-step validation of every data-entry step
pub fn validate_steps(
    draft: &RegistrationDraft,
    options: &ValidationOptions,
) -> Result<Vec<(WizardStep, ValidationReport)>, Box<dyn Error>> {
    let validator = Validator::new(options)?;
    let mut reports = Vec::new();

    for step in WizardStep::ALL.into_iter().filter(|s| !s.is_summary()) {
        let fields = step_fields(step, draft)?;
        reports.push((step, validator.validate_fields(draft, &fields)?));
    }

    // Fields outside every step's set (emails, addresses) are still checked
    let full = validator.validate(draft)?;
    for (path, message) in full.iter() {
        let owner = dorm_wizard::wizard::owning_step(path).unwrap_or(WizardStep::FIRST);
        if let Some((_, report)) = reports.iter_mut().find(|(step, _)| *step == owner) {
            report.insert(path.clone(), message.to_string());
        }
    }

    Ok(reports)
}

pub fn validate(path: &Path, config: &RuntimeConfig) -> Result<bool, Box<dyn Error>> {
    let draft = load_draft(path)?;
    let options = ValidationOptions::from_preferences(&config.wizard);
    let reports = validate_steps(&draft, &options)?;

    let mut valid = true;
    for (step, report) in &reports {
        if report.is_valid() {
            println!("  ok    {}", step.title());
            continue;
        }
        valid = false;
        println!("  FAIL  {} ({} error(s))", step.title(), report.len());
        for (field, message) in report.iter() {
            println!("          {}: {}", field, message);
        }
    }

    if valid {
        log::info!("{} is ready to submit", path.display());
    } else {
        log::warn!("{} has validation errors", path.display());
    }
    Ok(valid)
}

pub fn summary(path: &Path) -> Result<bool, Box<dyn Error>> {
    let draft = load_draft(path)?;
    print!("{}", render_summary(&Summary::from_draft(&draft)));
    Ok(true)
}

pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();
    for panel in &summary.panels {
        out.push_str(&format!("{}\n", panel.section));
        for row in &panel.rows {
            out.push_str(&format!("  {:<20} {}\n", row.label, row.value));
        }
    }
    out.push_str(&format!("Total: {:.2}\n", summary.total));
    out
}

pub fn submit(path: &Path, out: &Path, config: &RuntimeConfig) -> Result<bool, Box<dyn Error>> {
    let draft = load_draft(path)?;
    let submitter = FileSubmitter::new(out.to_path_buf());
    let mut wizard = RegistrationWizard::with_draft(submitter, config, draft)?;

    // Each data-entry step moves once, then the summary submits
    for _ in 0..WizardStep::ALL.len() {
        match block_on(wizard.advance())? {
            AdvanceOutcome::Moved { from, to } => {
                log::debug!("{} -> {}", from, to);
            }
            AdvanceOutcome::Blocked { step, errors } | AdvanceOutcome::Invalid { step, errors } => {
                println!("Blocked at {}:", step.title());
                for (field, message) in errors.iter() {
                    println!("  {}: {}", field, message);
                }
                return Ok(false);
            }
            AdvanceOutcome::Submitted(id) => {
                println!("Registration {} written to {}", id, out.display());
                return Ok(true);
            }
            AdvanceOutcome::SubmissionFailed(error) => {
                eprintln!("Submission failed: {}", error);
                return Ok(false);
            }
        }
    }

    Err("Wizard did not reach submission".into())
}

pub fn template(config: &RuntimeConfig) -> Result<bool, Box<dyn Error>> {
    let draft = RegistrationDraft::new(&config.wizard.default_nationality);
    println!("{}", serde_json::to_string_pretty(&draft)?);
    Ok(true)
}

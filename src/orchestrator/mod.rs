//! Mode orchestration state machine
//!
//! Resolves an installation mode to one of four fixed procedures and
//! sequences backup, shutdown, preservation, removal and handoff. Each run
//! handles exactly one mode end-to-end; the fresh-install step itself and
//! the later restore run as separate process invocations.

use std::fs;

use inquire::Confirm;

use crate::backup;
use crate::conflicts;
use crate::context::InstallContext;
use crate::error::{FlotillaError, Result, io_error};
use crate::handoff::{HandoffRecord, HandoffStore};
use crate::mode::InstallationMode;
use crate::preserve;
use crate::progress::StepSpinner;
use crate::runtime::DockerCli;
use crate::shutdown;
use crate::ui::Reporter;

/// What the caller should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Continue with the fresh-install step
    Proceed,
    /// Stop deliberately; distinct from a true error (check-only runs)
    DoNotProceed,
}

pub struct Orchestrator<'a> {
    ctx: &'a InstallContext,
    store: &'a dyn HandoffStore,
    docker: &'a DockerCli,
    ui: &'a Reporter,
    /// Automation-mode consent to proceed past an empty capture
    accept_data_loss: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        ctx: &'a InstallContext,
        store: &'a dyn HandoffStore,
        docker: &'a DockerCli,
        ui: &'a Reporter,
        accept_data_loss: bool,
    ) -> Self {
        Self {
            ctx,
            store,
            docker,
            ui,
            accept_data_loss,
        }
    }

    /// Run the procedure for one resolved mode
    pub fn execute(&self, mode: InstallationMode) -> Result<Outcome> {
        match mode {
            InstallationMode::Fresh => Ok(Outcome::Proceed),
            InstallationMode::Upgrade => self.upgrade(),
            InstallationMode::Force => self.force(),
            InstallationMode::CheckOnly => self.check_only(),
        }
    }

    /// backup → shutdown → preserve → remove → write handoff, in that
    /// fixed order; the destructive steps only run once a backup and a
    /// verified preservation bundle exist
    fn upgrade(&self) -> Result<Outcome> {
        if !self.ctx.root.is_dir() {
            return Err(FlotillaError::InvalidState {
                message: format!(
                    "no existing installation at {}; use fresh mode",
                    self.ctx.root.display()
                ),
            });
        }
        // A pending record means an earlier upgrade's restore never ran;
        // overwriting it would orphan that bundle.
        if self.store.load()?.is_some() {
            return Err(FlotillaError::InvalidState {
                message: "an upgrade handoff is already pending; run restore-preserved first"
                    .to_string(),
            });
        }

        self.ui.info("Creating backup before upgrade");
        let spinner = StepSpinner::start("Waiting for backup to finish", !self.ui.is_automation());
        let backup_result = backup::backup(self.ctx);
        spinner.finish();
        let backup_record = backup_result?;
        self.ui
            .success(&format!("Backup at {}", backup_record.archive.display()));

        self.run_shutdown();

        self.ui.info("Preserving credentials and data");
        let bundle = preserve::preserve(self.ctx)?;
        for warning in &bundle.warnings {
            self.ui.warning(warning);
        }
        if bundle.credentials_at_risk() && !self.confirm_data_loss()? {
            return Err(FlotillaError::UpgradeAborted {
                reason: "no credentials could be preserved and data loss was not accepted"
                    .to_string(),
            });
        }
        self.ui
            .success(&format!("Preserved {} file(s)", bundle.files_copied));

        self.remove_installation()?;

        self.store.save(&HandoffRecord {
            preserve_dir: bundle.dir.clone(),
            backup_file: backup_record.archive.clone(),
        })?;
        self.ui
            .success("Handoff written; proceed with the fresh install, then restore-preserved");

        Ok(Outcome::Proceed)
    }

    /// Backup is best-effort here; a force run exists to clear a broken
    /// installation whose backup tooling may be broken too
    fn force(&self) -> Result<Outcome> {
        match backup::backup(self.ctx) {
            Ok(record) => self
                .ui
                .success(&format!("Backup at {}", record.archive.display())),
            Err(err) => self.ui.warning(&format!("continuing without backup: {err}")),
        }

        self.run_shutdown();

        if self.ctx.root.exists() {
            self.remove_installation()?;
        }
        self.ui.success("Installation removed");

        Ok(Outcome::Proceed)
    }

    /// Diagnostics only; the outcome is always "do not proceed", even
    /// with zero conflicts
    fn check_only(&self) -> Result<Outcome> {
        let report = conflicts::run_probe(self.ctx)?;
        print!("{}", report.report);
        if report.conflicts_found {
            self.ui.warning("Conflicts detected; resolve them before installing");
        } else {
            self.ui.success("No conflicts found");
        }
        self.ui.recommend("Check-only run; not proceeding with installation");
        Ok(Outcome::DoNotProceed)
    }

    fn run_shutdown(&self) {
        let spinner = StepSpinner::start(
            "Stopping containers and scheduled jobs",
            !self.ui.is_automation(),
        );
        let report = shutdown::shutdown(self.ctx, self.docker);
        spinner.finish();
        self.ui.info(&format!(
            "Shutdown ran {} step(s)",
            report.completed.len() + report.warnings.len()
        ));
        for warning in &report.warnings {
            self.ui.warning(warning);
        }
    }

    /// All-or-nothing removal of the installation root
    fn remove_installation(&self) -> Result<()> {
        self.ui
            .info(&format!("Removing installation at {}", self.ctx.root.display()));
        fs::remove_dir_all(&self.ctx.root).map_err(|e| FlotillaError::RemoveFailed {
            path: self.ctx.root.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn confirm_data_loss(&self) -> Result<bool> {
        if self.ui.is_automation() {
            return Ok(self.accept_data_loss);
        }
        Confirm::new("No credentials could be preserved. Continue and accept their loss?")
            .with_default(false)
            .with_help_message("The upgrade aborts if you decline; nothing has been removed")
            .prompt()
            .map_err(|e| io_error(format!("Failed to read confirmation: {e}")))
    }
}

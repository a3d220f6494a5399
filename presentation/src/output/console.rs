//! Console output formatter for screening data

use colored::{ColoredString, Colorize};
use screening_domain::{
    ApplicationStatus, Author, ChatTurn, ConnectionStatus, Job, ScreeningDecision,
    ScreeningOutcome, User,
};

/// Formats chat turns, outcomes and profile data for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One chat turn, speaker label first
    pub fn format_turn(turn: &ChatTurn) -> String {
        let label = match turn.author() {
            Author::User => "You:".green().bold(),
            Author::Bot => "Bot:".cyan().bold(),
        };
        let mut lines = turn.text().lines();
        let first = lines.next().unwrap_or_default();
        let rest: Vec<&str> = lines.collect();

        if rest.is_empty() {
            format!("{} {}", label, first)
        } else {
            format!("{} {}\n{}", label, first, Self::indent(&rest.join("\n"), "     "))
        }
    }

    pub fn format_status(status: ConnectionStatus) -> String {
        let text = format!("[{}]", status);
        let colored = match status {
            ConnectionStatus::Connecting => text.yellow(),
            ConnectionStatus::Connected => text.green(),
            ConnectionStatus::Disconnected => text.dimmed(),
            ConnectionStatus::Errored => text.red(),
        };
        colored.to_string()
    }

    /// Full results view for a screening outcome
    pub fn format_outcome(outcome: &ScreeningOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Screening Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Application:".cyan().bold(),
            outcome.application_id
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Decision:".cyan().bold(),
            Self::decision(outcome.screening_decision)
        ));

        output.push_str(&Self::section_header("Summary"));
        match &outcome.screening_summary {
            Some(summary) if !summary.trim().is_empty() => {
                output.push_str(&format!("\n{}\n", Self::indent(summary, "  ")));
            }
            _ => output.push_str(&format!("\n  {}\n", "No summary available.".dimmed())),
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_jobs(jobs: &[Job]) -> String {
        if jobs.is_empty() {
            return format!("{}\n", "No jobs posted.".dimmed());
        }

        let mut output = String::new();
        output.push_str(&Self::section_header("Jobs"));
        for job in jobs {
            let name = if job.is_active {
                job.job_name.bold()
            } else {
                format!("{} (closed)", job.job_name).dimmed()
            };
            output.push_str(&format!("\n{} {}\n", name, format!("[{}]", job.id).dimmed()));
            if !job.job_location.is_empty() {
                output.push_str(&format!("  {} {}\n", "Location:".cyan(), job.job_location));
            }
            if !job.job_description.is_empty() {
                output.push_str(&format!("{}\n", Self::indent(&job.job_description, "  ")));
            }
        }
        output
    }

    /// Profile card plus the applicant's applications
    pub fn format_user(user: &User) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} {}\n",
            "Applicant:".cyan().bold(),
            user.full_name().bold(),
            format!("[{}]", user.id).dimmed()
        ));
        output.push_str(&format!("{} {}\n", "Email:".cyan(), user.email));

        let mut address = user.address.clone();
        if let Some(apt) = user.apt_num.as_deref().filter(|a| !a.is_empty()) {
            address.push_str(&format!(", Apt {}", apt));
        }
        if !address.is_empty() {
            output.push_str(&format!(
                "{} {}, {} {}\n",
                "Address:".cyan(),
                address,
                user.state,
                user.zip_code
            ));
        }

        output.push_str(&Self::section_header("Applications"));
        if user.job_applications.is_empty() {
            output.push_str(&format!("\n  {}\n", "No applications yet.".dimmed()));
        }
        for app in &user.job_applications {
            output.push_str(&format!(
                "\n  {} {} {}\n",
                app.job_name.bold(),
                Self::application_status(app.screening_decision),
                format!("(application {})", app.application_id).dimmed()
            ));
        }

        output
    }

    pub fn format_error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    fn decision(decision: ScreeningDecision) -> ColoredString {
        match decision {
            ScreeningDecision::Approved => decision.label().green().bold(),
            ScreeningDecision::Denied => decision.label().red().bold(),
            ScreeningDecision::Pending => decision.label().yellow().bold(),
            ScreeningDecision::UserCanceled => decision.label().dimmed(),
        }
    }

    fn application_status(status: ApplicationStatus) -> ColoredString {
        Self::decision(status.as_decision())
    }

    pub fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

//! `primer check` command implementation.
//!
//! Composes every linked route and reports missing lessons and block
//! diagnostics without starting a server.

use clap::Args;
use primer_config::CliSettings;
use primer_renderer::Diagnostic;
use primer_site::Site;

use crate::commands::{SiteArgs, load_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Treat routes without content as errors.
    #[arg(long)]
    strict: bool,
}

/// Problems found on one route.
#[derive(Debug, Default, PartialEq, Eq)]
struct RouteProblems {
    route: String,
    missing: bool,
    failure: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config(CliSettings::default())?;
        let site = load_site(&config)?;

        let problems = check_site(&site);
        let mut errors = 0;
        for route in &problems {
            output.route(&route.route);
            if route.missing {
                output.problem(None, "no content");
                if self.strict {
                    errors += 1;
                }
            }
            if let Some(failure) = &route.failure {
                output.problem(None, failure);
                errors += 1;
            }
            for diagnostic in &route.diagnostics {
                output.problem(Some(diagnostic.line()), &diagnostic.to_string());
                errors += 1;
            }
        }

        if errors > 0 {
            return Err(CliError::Validation(format!(
                "{errors} problem(s) in {} route(s)",
                problems.len()
            )));
        }
        output.success(&format!("Checked {} routes", site.routes().len()));
        Ok(())
    }
}

/// Compose every linked route, keeping only routes with problems.
fn check_site(site: &Site) -> Vec<RouteProblems> {
    site.routes()
        .into_iter()
        .filter_map(|route| {
            let mut problems = RouteProblems {
                route: route.to_string(),
                ..RouteProblems::default()
            };
            match site.render(&route) {
                Ok(page) => problems.diagnostics = page.diagnostics,
                Err(err) if err.is_not_found() => problems.missing = true,
                Err(err) => problems.failure = Some(err.to_string()),
            }
            let clean =
                !problems.missing && problems.failure.is_none() && problems.diagnostics.is_empty();
            (!clean).then_some(problems)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use primer_nav::NavTree;
    use primer_site::SiteConfig;
    use primer_storage::MemorySource;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_check_site_reports_missing_and_diagnostics() {
        let tree = NavTree::from_toml(
            r#"
[[chapter]]
id = "measurements"
title = "1. Quantities and Measurements"
base_path = "/physics/measurements"

[[chapter.entry]]
title = "1.1 Physical Quantities & Prefixes"
path = "/physics/measurements/physical_quantities_prefixes"
"#,
        )
        .unwrap();
        let source = MemorySource::new()
            .with_document("/", "# Home\n")
            .with_document(
                "/physics/measurements/physical_quantities_prefixes",
                "# Quantities\n\n<PracticeMCQ_Homogenity />\n",
            );
        let site = Site::new(Arc::new(tree), Arc::new(source), SiteConfig::default());

        let problems = check_site(&site);

        assert_eq!(
            problems,
            vec![
                RouteProblems {
                    route: "/physics/measurements".to_owned(),
                    missing: true,
                    ..RouteProblems::default()
                },
                RouteProblems {
                    route: "/physics/measurements/physical_quantities_prefixes".to_owned(),
                    diagnostics: vec![Diagnostic::UnregisteredBlockType {
                        line: 3,
                        name: "PracticeMCQ_Homogenity".to_owned(),
                    }],
                    ..RouteProblems::default()
                },
            ]
        );
    }
}

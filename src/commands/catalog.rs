use crate::*;

pub fn status_report(badges: &Workflow) -> StatusReport {
    let config = badges.config();
    let catalog = badges.catalog();
    StatusReport {
        user: config.user.clone(),
        repo: config.repo.clone(),
        storage: config.storage.clone(),
        has_issuer: catalog.has_issuer,
        class_count: catalog.classes.len(),
        badge_count: catalog.badge_count(),
        classes: catalog
            .classes
            .iter()
            .map(|c| ClassSummary {
                name: c.name.clone(),
                badge_count: c.badges.len(),
            })
            .collect(),
    }
}

pub fn handle_catalog_commands(cli: &Cli, badges: &Workflow) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Status => {
            print_one(cli.json, status_report(badges), |r| {
                let mut lines = vec![
                    format!("repository: {}/{}", r.user, r.repo),
                    format!("storage: {}", r.storage),
                    format!(
                        "issuer: {}",
                        if r.has_issuer { "present" } else { "missing" }
                    ),
                    format!("classes: {} ({} badges)", r.class_count, r.badge_count),
                ];
                lines.extend(
                    r.classes
                        .iter()
                        .map(|c| format!("{}\t{}", c.name, c.badge_count)),
                );
                lines.join("\n")
            })?;
        }
        Commands::Classes => {
            let classes = &badges.catalog().classes;
            print_out(cli.json, classes, |c| {
                format!("{}\t{}", c.name, c.badges.len())
            })?;
        }
        Commands::Badges { class } => {
            let Some(entry) = badges.catalog().class(class) else {
                anyhow::bail!("class not found: {}", class);
            };
            print_out(cli.json, &entry.badges, |uid| uid.clone())?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

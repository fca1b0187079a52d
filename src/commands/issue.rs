use crate::*;

pub fn handle_issue_commands(cli: &Cli, badges: &Workflow) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Issuer {
            command:
                IssuerCommands::Create {
                    name,
                    url,
                    description,
                    image,
                    email,
                },
        } => {
            let doc = badges.create_issuer(&IssuerInput {
                name: name.clone(),
                url: url.clone(),
                description: description.clone(),
                image: image.clone(),
                email: email.clone(),
            })?;
            audit(
                "issuer.create",
                serde_json::json!({"name": doc.name, "repo": badges.config().repo}),
            );
            print_document(cli.json, &doc)?;
        }
        Commands::Class {
            command:
                ClassCommands::Create {
                    name,
                    description,
                    image,
                    criteria,
                },
        } => {
            if !badges.catalog().has_issuer {
                tracing::warn!("repository has no issuer yet; the class will not reconcile until one is created");
            }
            let document = badges.create_class(&ClassInput {
                name: name.clone(),
                description: description.clone(),
                image: image.clone(),
                criteria: criteria.clone(),
            })?;
            let issued = IssuedClass {
                segment: class_segment(name),
                document,
            };
            audit(
                "class.create",
                serde_json::json!({"class": issued.segment, "repo": badges.config().repo}),
            );
            print_document(cli.json, &issued)?;
        }
        Commands::Badge {
            command: BadgeCommands::Create { class, email },
        } => {
            if badges.catalog().class(class).is_none() {
                tracing::warn!(%class, "class is not in the catalog snapshot");
            }
            let assertion = badges.create_badge(&BadgeInput {
                class: class.clone(),
                email: email.clone(),
            })?;
            audit(
                "badge.create",
                serde_json::json!({"class": class, "uid": assertion.uid, "recipient": email}),
            );
            print_document(cli.json, &assertion)?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

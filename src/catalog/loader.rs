//! Catalog loader with support for embedded data, local files (YAML or JSON)
//! and in-memory strings. Every load path runs the same validation.

use super::{Catalog, Provider};
use crate::error::{Error, ErrorContext};
use crate::Result;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const SOURCE: &str = "catalog_loader";

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    providers: Vec<Provider>,
}

pub(super) fn parse_yaml(content: &str) -> Result<Catalog> {
    let doc: CatalogDocument = serde_yaml::from_str(content)?;
    build(doc)
}

pub(super) fn parse_json(content: &str) -> Result<Catalog> {
    let doc: CatalogDocument = serde_json::from_str(content)?;
    build(doc)
}

pub(super) fn load_path(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_json(&content),
        Some("yaml") | Some("yml") => parse_yaml(&content),
        other => Err(Error::configuration_with_context(
            "unsupported catalog file extension",
            ErrorContext::new()
                .with_details(format!(
                    "{} has extension {:?}; expected .yaml, .yml or .json",
                    path.display(),
                    other
                ))
                .with_source(SOURCE),
        )),
    }
}

fn build(doc: CatalogDocument) -> Result<Catalog> {
    validate(&doc.providers)?;
    tracing::debug!(
        providers = doc.providers.len(),
        models = doc.providers.iter().map(|p| p.models.len()).sum::<usize>(),
        "catalog loaded"
    );
    Ok(Catalog {
        providers: doc.providers,
    })
}

fn invalid(message: &str, field_path: String, details: String) -> Error {
    Error::configuration_with_context(
        message,
        ErrorContext::new()
            .with_field_path(field_path)
            .with_details(details)
            .with_source(SOURCE),
    )
}

fn validate(providers: &[Provider]) -> Result<()> {
    let mut provider_ids = HashSet::new();
    let mut model_ids = HashSet::new();

    for (pi, provider) in providers.iter().enumerate() {
        if provider.id.trim().is_empty() {
            return Err(invalid(
                "empty provider id",
                format!("providers[{}].id", pi),
                String::new(),
            ));
        }
        if !provider_ids.insert(provider.id.as_str()) {
            return Err(invalid(
                "duplicate provider id",
                format!("providers[{}].id", pi),
                provider.id.clone(),
            ));
        }

        for (mi, model) in provider.models.iter().enumerate() {
            let path = format!("providers[{}].models[{}]", pi, mi);
            if model.id.trim().is_empty() {
                return Err(invalid("empty model id", format!("{}.id", path), String::new()));
            }
            if !model_ids.insert(model.id.as_str()) {
                return Err(invalid(
                    "duplicate model id",
                    format!("{}.id", path),
                    model.id.clone(),
                ));
            }
            for (label, price) in model.pricing.labelled_prices() {
                if !price.is_finite() || price < 0.0 {
                    return Err(invalid(
                        "price must be a non-negative number",
                        format!("{}.pricing.{}", path, label),
                        price.to_string(),
                    ));
                }
            }
            if let Some(ref tier) = model.pricing.high_context {
                if tier.threshold == 0 {
                    return Err(invalid(
                        "high-context threshold must be positive",
                        format!("{}.pricing.high_context.threshold", path),
                        model.id.clone(),
                    ));
                }
            }
        }
    }
    Ok(())
}

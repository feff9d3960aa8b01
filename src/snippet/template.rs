use handlebars::Handlebars;
use std::collections::HashMap;
use tracing::debug;

use crate::prompt::Prompter;
use crate::snippet::step::Step;
use crate::types::{Result, TemplateError};

/// Materialize a step's runnable command by substituting every declared
/// template field
///
/// Fields are resolved in declaration order: with `use_defaults` the stored
/// default (empty string if none) is substituted without prompting,
/// otherwise the prompter is asked exactly once per distinct field name.
/// Substitution itself never executes anything.
pub fn resolve(step: &Step, use_defaults: bool, prompter: &dyn Prompter) -> Result<String> {
    // a step with no declared fields runs its command verbatim, even if it
    // contains literal braces
    if step.template_fields.is_empty() {
        return Ok(step.command.clone());
    }

    let mut values: HashMap<String, String> = HashMap::new();
    for field in &step.template_fields {
        let value = if use_defaults {
            field.default_value().to_string()
        } else {
            prompter.ask(&format!("{}: ", field.name()), field.default_value())?
        };
        values.insert(field.name().to_string(), value);
    }

    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true); // fail on placeholders missing from template_fields
    handlebars.register_escape_fn(handlebars::no_escape); // shell text, not HTML

    let resolved = handlebars
        .render_template(&step.command, &values)
        .map_err(|e| TemplateError::Render { source: e })?;

    // consistency check: no placeholder syntax may survive substitution
    if resolved.contains("{{") || resolved.contains("}}") {
        return Err(TemplateError::Unresolved { command: resolved }.into());
    }

    debug!(
        command = %step.command,
        resolved = %resolved,
        "template resolution completed"
    );

    Ok(resolved)
}

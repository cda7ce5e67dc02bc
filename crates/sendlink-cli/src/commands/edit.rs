use sendlink_core::ShareLink;

use crate::cli::EditArgs;
use crate::config::{self, AppContext};
use crate::helpers::parsing;
use crate::output;

pub async fn run(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let body = parsing::parse_body(&args.body, args.base64)?;
    let draft = parsing::build_draft(body, &args.emails, args.password.as_deref())?;

    let account_key = config::account_key()?;
    let api = ctx.owner_api()?;

    // Sealing an edit proves ownership (the envelope must decrypt) and
    // reuses the existing fragment bytes, so the distributed link survives.
    let envelope = api.get(&args.id).await?;
    let upsert = envelope.seal_edit(&account_key, &draft)?;
    let updated = api.edit(&args.id, &upsert).await?;

    let fragment_key = envelope.unwrap_fragment_key(&account_key)?;
    let link = ShareLink::new(updated.access_id.clone(), fragment_key);

    if args.json {
        let view = updated.decrypt(&account_key)?;
        let mut value = serde_json::to_value(&view)?;
        value["shareLink"] = serde_json::Value::String(link.format(ctx.server()));
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        if !ctx.quiet {
            println!("Edited Send {}", updated.id);
        }
        output::print_view_plain(&updated.decrypt(&account_key)?, ctx.quiet);
    }
    Ok(())
}

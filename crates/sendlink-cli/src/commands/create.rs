use sendlink_core::ShareLink;

use crate::cli::CreateArgs;
use crate::config::{self, AppContext};
use crate::helpers::parsing;

pub async fn run(ctx: &AppContext, args: &CreateArgs) -> anyhow::Result<()> {
    // Validation first: a bad body or a gate conflict aborts before any key
    // material exists and before the server is touched.
    let body = parsing::parse_body(&args.body, args.base64)?;
    let draft = parsing::build_draft(body, &args.emails, args.password.as_deref())?;

    let account_key = config::account_key()?;
    let sealed = draft.seal(&account_key)?;

    let api = ctx.owner_api()?;
    let envelope = api.create(&sealed.upsert).await?;

    let link = ShareLink::new(envelope.access_id.clone(), sealed.fragment_key);
    let share_link = link.format(ctx.server());

    if args.json {
        let view = envelope.decrypt(&account_key)?;
        let mut value = serde_json::to_value(&view)?;
        value["shareLink"] = serde_json::Value::String(share_link);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        if !ctx.quiet {
            println!("Created Send {}", envelope.id);
        }
        println!("{}", share_link);
    }
    Ok(())
}

use crate::cli::RemovePasswordArgs;
use crate::config::{self, AppContext};
use crate::output;

pub async fn run(ctx: &AppContext, args: &RemovePasswordArgs) -> anyhow::Result<()> {
    let account_key = config::account_key()?;
    let api = ctx.owner_api()?;
    let envelope = api.remove_password(&args.id).await?;
    let view = envelope.decrypt(&account_key)?;

    if args.json {
        output::print_view_json(&view)?;
    } else {
        if !ctx.quiet {
            println!("Removed password from Send {}", args.id);
        }
        output::print_view_plain(&view, ctx.quiet);
    }
    Ok(())
}

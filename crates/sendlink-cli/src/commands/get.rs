use crate::cli::GetArgs;
use crate::config::{self, AppContext};
use crate::output;

pub async fn run(ctx: &AppContext, args: &GetArgs) -> anyhow::Result<()> {
    let account_key = config::account_key()?;
    let api = ctx.owner_api()?;
    let envelope = api.get(&args.id).await?;
    let view = envelope.decrypt(&account_key)?;

    if args.json {
        output::print_view_json(&view)?;
    } else {
        output::print_view_plain(&view, ctx.quiet);
    }
    Ok(())
}

use crate::cli::ListArgs;
use crate::config::{self, AppContext};
use crate::output;

pub async fn run(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let account_key = config::account_key()?;
    let api = ctx.owner_api()?;

    let envelopes = api.list().await?;
    let views = envelopes
        .iter()
        .map(|e| e.decrypt(&account_key))
        .collect::<sendlink_core::Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&views)?);
    } else {
        output::print_view_list(&views, ctx.quiet);
    }
    Ok(())
}

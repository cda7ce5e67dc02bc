use crate::cli::DeleteArgs;
use crate::config::AppContext;

pub async fn run(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let api = ctx.owner_api()?;
    api.delete(&args.id).await?;
    if !ctx.quiet {
        println!("Deleted Send {}", args.id);
    }
    Ok(())
}

use anyhow::Result;
use filemover_core::calendar::Provider;
use owo_colors::OwoColorize;

pub async fn run(provider_name: &str) -> Result<()> {
    let provider = Provider::from_name(provider_name);

    println!("Authenticating with {provider_name}...");

    // The provider runs the sign-in flow and keeps the tokens itself
    let account = provider.authenticate().await?;

    println!("Authenticated as: {}\n", account.green());
    println!("Run `filemover events --provider {provider_name}` to see matching events.");

    Ok(())
}

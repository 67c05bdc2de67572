// Example: Creating a session key and running a sponsored call with it
//
// This example demonstrates how to:
// 1. Build a session policy with allowlists
// 2. Register it through a transport
// 3. Check a call batch against the session before sponsoring it

use std::sync::Arc;

use async_trait::async_trait;
use sessionkit_sdk::{
    guard, paymaster_from, AccountCall, CallTransport, Felt, GuardInit, InvokeResult,
    PaymasterContext, SessionUseOptions, SmartAccount,
};

/// Prints invokes instead of sending them.
struct PrintTransport;

#[async_trait]
impl CallTransport for PrintTransport {
    async fn invoke(
        &self,
        address: &Felt,
        entrypoint: &str,
        calldata: &[Felt],
    ) -> sessionkit_sdk::Result<InvokeResult> {
        let felts: Vec<String> = calldata.iter().map(|f| f.to_string()).collect();
        println!("  invoke {}::{} [{}]", address, entrypoint, felts.join(", "));
        Ok(InvokeResult {
            tx_hash: Felt::from(0xabcu32),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Connected account
    let account = SmartAccount::new("0x4a11ce".parse()?).with_transport(Arc::new(PrintTransport));

    // 2. One-hour session limited to a single contract and entrypoint
    let policy = guard(GuardInit {
        max_calls: Some(5),
        max_value: Some("1000000000000000000".to_string()),
        expires_in_seconds: Some(3600),
        ..Default::default()
    })
    .target("0x0dead")
    .selector("0x1234")
    .build()?;

    println!("Creating session:");
    let mut sessions = account.sessions();
    let session = sessions.create(policy).await?;
    println!("  Session key: {}", session.pubkey);
    println!("  Valid until: {}", session.policy.valid_until);

    // 3. Check the batch, then sponsor and submit it
    let call = AccountCall::new("0xdead".parse()?, "0x1234".parse()?, vec![Felt::from(1u8)]);
    sessions
        .use_session(&session.id, SessionUseOptions::default())?
        .ensure_call_allowed(&call)?;

    let runner = account.with_paymaster(paymaster_from("noop")?, PaymasterContext::default())?;
    println!("Executing sponsored call:");
    let result = runner.execute(vec![call], None).await?;
    println!(
        "  tx {} (sponsored: {}, by {})",
        result.tx_hash, result.sponsored, result.sponsor_name
    );

    Ok(())
}

//! Lookup, update and create against the in-memory client.

use tpmstore::backends::mock::MockClient;
use tpmstore::notify::TracingNotifier;
use tpmstore::lookup;

fn terms(extra: &[&str]) -> Vec<String> {
    ["https://tpm.example.com", "ansible", "s3cret"]
        .iter()
        .chain(extra.iter())
        .map(|s| s.to_string())
        .collect()
}

#[tokio::main]
async fn main() -> tpmstore::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let mock = MockClient::new();
    mock.add_entry("db-root", &[("password", "hunter2"), ("username", "root")])
        .await;
    let factory = mock.factory();

    let password = lookup::run(&terms(&["name=db-root"]), &factory, &TracingNotifier).await?;
    println!("db-root password: {}", password[0]);

    let username = lookup::run(
        &terms(&["name=db-root", "return_value=username"]),
        &factory,
        &TracingNotifier,
    )
    .await?;
    println!("db-root username: {}", username[0]);

    let rotated = lookup::run(
        &terms(&["name=db-root", "create=True", "password=random"]),
        &factory,
        &TracingNotifier,
    )
    .await?;
    println!("db-root rotated to: {}", rotated[0]);

    let created = lookup::run(
        &terms(&[
            "name=web-deploy",
            "create=True",
            "project_id=4",
            "password=random",
            "tags=web,deploy",
        ]),
        &factory,
        &TracingNotifier,
    )
    .await?;
    println!("web-deploy created with: {}", created[0]);

    match lookup::run(&terms(&["name=missing"]), &factory, &TracingNotifier).await {
        Ok(_) => println!("unexpected match"),
        Err(e) => println!("{} error: {}", e.kind(), e),
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    match hpl_cli::main_entry().await {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            hpl_protocol::ExitCode::Unknown.into()
        }
    }
}

use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use webdisco::{
    config::Config,
    interrupt::{interpret, InterruptHandler},
    output::{self, OutputStore},
    queue::RunQueue,
    target,
    tools::{ToolRegistry, DEFAULT_TOOLS, DIRB, NIKTO, NMAP, SSLSCAN},
    types::Decision,
    Result, ScanError,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_parse_https_target() -> Result<()> {
    let descriptor = target::parse("https://example.com")?;

    assert_eq!(descriptor.scheme, "https");
    assert_eq!(descriptor.hostname, "example.com");
    assert_eq!(descriptor.netloc, "example.com");
    assert_eq!(descriptor.port, None);
    assert_eq!(descriptor.path, None);
    assert_eq!(descriptor.base_url(), "https://example.com");
    Ok(())
}

#[test]
fn test_parse_port_and_path() -> Result<()> {
    let descriptor = target::parse("http://example.com:8080/admin")?;

    assert_eq!(descriptor.scheme, "http");
    assert_eq!(descriptor.hostname, "example.com");
    assert_eq!(descriptor.port, Some(8080));
    assert_eq!(descriptor.netloc, "example.com:8080");
    assert_eq!(descriptor.path.as_deref(), Some("/admin"));
    assert_eq!(descriptor.full_url(), "http://example.com:8080/admin");
    assert_eq!(descriptor.to_string(), "http://example.com:8080/admin");
    Ok(())
}

#[test]
fn test_parse_trailing_slash_has_no_path() -> Result<()> {
    let descriptor = target::parse("http://example.com/")?;
    assert_eq!(descriptor.path, None);

    // the default port is not repeated on the command line
    let descriptor = target::parse("https://example.com:443")?;
    assert_eq!(descriptor.port, None);
    assert_eq!(descriptor.netloc, "example.com");
    Ok(())
}

#[test]
fn test_parse_ip_literals() -> Result<()> {
    let v4 = target::parse("http://192.168.1.10:8000")?;
    assert_eq!(v4.hostname, "192.168.1.10");
    assert_eq!(v4.netloc, "192.168.1.10:8000");

    let v6 = target::parse("https://[::1]:8443/")?;
    assert_eq!(v6.hostname, "::1");
    assert_eq!(v6.netloc, "[::1]:8443");
    Ok(())
}

#[test]
fn test_parse_without_scheme_is_recoverable() {
    for raw in ["example.com", "www.example.com/login", "ftp://example.com", ""] {
        let err = target::parse(raw).unwrap_err();
        assert!(matches!(err, ScanError::MissingScheme(_)), "{raw}: {err:?}");
        assert!(err.is_recoverable());
    }
}

#[test]
fn test_parse_malformed_is_fatal() {
    for raw in ["http://", "httpexample.com", "httpx://example.com"] {
        let err = target::parse(raw).unwrap_err();
        assert!(matches!(err, ScanError::MalformedTarget(_)), "{raw}: {err:?}");
        assert!(!err.is_recoverable());
    }
}

#[tokio::test]
async fn test_resolve_literal_addresses() -> Result<()> {
    target::resolve("127.0.0.1").await?;
    target::resolve("::1").await?;
    target::resolve("203.0.113.7").await?;
    Ok(())
}

#[tokio::test]
async fn test_resolve_unknown_host_fails() {
    let err = target::resolve("webdisco-test.invalid").await.unwrap_err();
    assert!(
        matches!(err, ScanError::UnresolvableHost(ref host) if host == "webdisco-test.invalid")
    );
}

#[test]
fn test_sslscan_uses_netloc() -> Result<()> {
    let registry = ToolRegistry::new();

    let plain = target::parse("https://example.com")?;
    assert_eq!(registry.build(SSLSCAN, &plain, None), Some(strings(&["sslscan", "example.com"])));

    let ported = target::parse("https://example.com:8443/app")?;
    assert_eq!(
        registry.build(SSLSCAN, &ported, Some("http://127.0.0.1:8080")),
        Some(strings(&["sslscan", "example.com:8443"]))
    );
    Ok(())
}

#[test]
fn test_nmap_uses_hostname_only() -> Result<()> {
    let registry = ToolRegistry::new();
    let descriptor = target::parse("https://example.com:8443/app")?;

    assert_eq!(
        registry.build(NMAP, &descriptor, Some("http://127.0.0.1:8080")),
        Some(strings(&["nmap", "-Pn", "-A", "example.com"]))
    );
    Ok(())
}

#[test]
fn test_nikto_ssl_flag_follows_scheme() -> Result<()> {
    let registry = ToolRegistry::new();

    let https = target::parse("https://example.com/ignored")?;
    assert_eq!(
        registry.build(NIKTO, &https, None),
        Some(strings(&["nikto", "-h", "https://example.com", "-ssl"]))
    );

    let http = target::parse("http://example.com:8080")?;
    let argv = registry.build(NIKTO, &http, None).unwrap();
    assert_eq!(argv, strings(&["nikto", "-h", "http://example.com:8080"]));
    assert!(!argv.contains(&"-ssl".to_string()));
    Ok(())
}

#[test]
fn test_proxy_flags_only_when_configured() -> Result<()> {
    let registry = ToolRegistry::new();
    let descriptor = target::parse("http://example.com")?;
    let proxy = "http://127.0.0.1:8080";

    let nikto = registry.build(NIKTO, &descriptor, Some(proxy)).unwrap();
    assert_eq!(&nikto[nikto.len() - 2..], &strings(&["-useproxy", proxy])[..]);
    let nikto = registry.build(NIKTO, &descriptor, None).unwrap();
    assert!(!nikto.contains(&"-useproxy".to_string()));

    let dirb = registry.build(DIRB, &descriptor, Some(proxy)).unwrap();
    assert_eq!(&dirb[dirb.len() - 2..], &strings(&["-p", proxy])[..]);
    let dirb = registry.build(DIRB, &descriptor, None).unwrap();
    assert!(!dirb.contains(&"-p".to_string()));
    Ok(())
}

#[test]
fn test_dirb_includes_path() -> Result<()> {
    let registry = ToolRegistry::new();

    let with_path = target::parse("http://example.com/admin/")?;
    assert_eq!(
        registry.build(DIRB, &with_path, None),
        Some(strings(&["dirb", "http://example.com/admin/", "-S", "-w"]))
    );

    let bare = target::parse("https://example.com")?;
    assert_eq!(
        registry.build(DIRB, &bare, None),
        Some(strings(&["dirb", "https://example.com", "-S", "-w"]))
    );
    Ok(())
}

#[test]
fn test_unknown_tool_has_no_invocation() -> Result<()> {
    let registry = ToolRegistry::new();
    let descriptor = target::parse("https://example.com")?;
    assert_eq!(registry.build("zap", &descriptor, None), None);
    Ok(())
}

#[test]
fn test_binary_override_keeps_arguments() -> Result<()> {
    let mut binaries = HashMap::new();
    binaries.insert(NIKTO.to_string(), "/opt/nikto/program/nikto.pl".to_string());
    let registry = ToolRegistry::with_binaries(binaries);
    let descriptor = target::parse("https://example.com")?;

    assert_eq!(
        registry.build(NIKTO, &descriptor, None),
        Some(strings(&["/opt/nikto/program/nikto.pl", "-h", "https://example.com", "-ssl"]))
    );
    assert_eq!(registry.build(NMAP, &descriptor, None).unwrap()[0], "nmap");
    Ok(())
}

#[test]
fn test_plaintext_target_never_gets_tls_scan() -> Result<()> {
    let registry = ToolRegistry::new();
    let http = target::parse("http://example.com")?;

    let applicable = registry.applicable_tools(&strings(&["sslscan", "nikto"]), &http);
    assert_eq!(applicable.tools, strings(&["nikto"]));
    assert_eq!(applicable.tls_skipped, strings(&["sslscan"]));
    assert!(applicable.unknown.is_empty());

    // filtering is per target, the next https target still gets it
    let https = target::parse("https://example.com")?;
    let applicable = registry.applicable_tools(&strings(&["sslscan", "nikto"]), &https);
    assert_eq!(applicable.tools, strings(&["sslscan", "nikto"]));
    assert!(applicable.tls_skipped.is_empty());
    Ok(())
}

#[test]
fn test_applicable_tools_keep_order_and_drop_unknown() -> Result<()> {
    let registry = ToolRegistry::new();
    let descriptor = target::parse("https://example.com")?;

    let requested = strings(&["dirb", "zap", "nmap", "dirb", "nikto"]);
    let applicable = registry.applicable_tools(&requested, &descriptor);
    assert_eq!(applicable.tools, strings(&["dirb", "nmap", "nikto"]));
    assert_eq!(applicable.unknown, strings(&["zap"]));
    Ok(())
}

#[test]
fn test_registry_covers_defaults() {
    for name in DEFAULT_TOOLS {
        assert!(ToolRegistry::get(name).is_some(), "{name} not registered");
    }
    assert_eq!(ToolRegistry::specs().len(), DEFAULT_TOOLS.len());
    assert!(ToolRegistry::get(SSLSCAN).unwrap().requires_tls);
}

#[test]
fn test_output_file_naming() {
    assert_eq!(output::file_name("a.b.c", "nmap"), "a-b-c_nmap.txt");
    assert_eq!(output::file_name("a.b.c", "nmap"), output::file_name("a.b.c", "nmap"));
    assert_eq!(output::file_name("10.0.0.1", "dirb"), "10-0-0-1_dirb.txt");

    let store = OutputStore::new("/tmp/out");
    assert_eq!(
        store.path_for("example.com", "nikto"),
        PathBuf::from("/tmp/out/example-com_nikto.txt")
    );
}

#[tokio::test]
async fn test_output_store_creates_directory_and_overwrites() -> Result<()> {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = OutputStore::new(temp_dir.path().join("results"));

    let path = store.write("www.example.com", "nikto", b"first run\n").await?;
    assert_eq!(path, temp_dir.path().join("results").join("www-example-com_nikto.txt"));

    store.write("www.example.com", "nikto", b"second run\n").await?;
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "second run\n");
    Ok(())
}

#[tokio::test]
async fn test_output_store_reports_write_failure() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    // a regular file where the directory should be
    let store = OutputStore::new(temp_file.path());

    let err = store.write("example.com", "nmap", b"data").await.unwrap_err();
    assert!(matches!(err, ScanError::Persist { .. }));
}

#[tokio::test]
async fn test_queue_from_file() -> Result<()> {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        temp_file.path(),
        "https://example.com\n\n  http://test.example.com/app  \n# staging\nexample.org\n",
    )
    .unwrap();

    let mut queue = RunQueue::from_file(temp_file.path()).await?;
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.pop_front().as_deref(), Some("https://example.com"));
    assert_eq!(queue.pop_front().as_deref(), Some("http://test.example.com/app"));
    assert_eq!(queue.pop_front().as_deref(), Some("example.org"));
    assert!(queue.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_queue_missing_file() {
    let err = RunQueue::from_file(std::path::Path::new("/nonexistent/targets.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::TargetFileMissing(_)));
}

#[test]
fn test_binary_exits_non_zero_without_targets() {
    let missing = Command::new(env!("CARGO_BIN_EXE_webdisco"))
        .args(["-q", "-T", "/nonexistent/webdisco-targets.txt"])
        .output()
        .unwrap();
    assert!(!missing.status.success());
    assert!(!String::from_utf8_lossy(&missing.stdout).contains("Running:"));

    let none = Command::new(env!("CARGO_BIN_EXE_webdisco")).arg("-q").output().unwrap();
    assert!(!none.status.success());
}

#[tokio::test]
async fn test_queue_sources() -> Result<()> {
    let single = RunQueue::from_sources(Some("https://example.com"), None).await?;
    assert_eq!(single.iter().collect::<Vec<_>>(), vec!["https://example.com"]);

    let err = RunQueue::from_sources(None, None).await.unwrap_err();
    assert!(matches!(err, ScanError::NoTarget));

    let temp_file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "http://one.example.com\nhttp://two.example.com\n").unwrap();
    let from_file =
        RunQueue::from_sources(Some("https://example.com"), Some(temp_file.path())).await?;
    assert_eq!(from_file.len(), 2);
    Ok(())
}

#[test]
fn test_interpret_answers() {
    assert_eq!(interpret(""), Some(Decision::Continue));
    assert_eq!(interpret("\n"), Some(Decision::Continue));
    assert_eq!(interpret("c\n"), Some(Decision::Continue));
    assert_eq!(interpret("C"), Some(Decision::Continue));
    assert_eq!(interpret("a\n"), Some(Decision::Abort));
    assert_eq!(interpret("A"), Some(Decision::Abort));
    assert_eq!(interpret("yes"), None);
    assert_eq!(interpret("abort"), None);
}

#[test]
fn test_interrupt_handler_reprompts() -> Result<()> {
    let mut handler = InterruptHandler::new(Cursor::new(b"maybe\nq\nc\n".to_vec()), Vec::new());
    assert_eq!(handler.on_interrupt("nikto")?, Decision::Continue);

    let (input, output) = handler.into_inner();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("nikto has been killed!"));
    assert_eq!(output.matches("I don't know what you mean, try again!").count(), 2);
    assert_eq!(output.matches("Continue (c) or Abort (a)").count(), 3);
    assert!(output.contains("Continuing"));
    assert_eq!(input.position() as usize, b"maybe\nq\nc\n".len());
    Ok(())
}

#[test]
fn test_interrupt_handler_default_and_abort() -> Result<()> {
    let mut handler = InterruptHandler::new(Cursor::new(b"\n".to_vec()), std::io::sink());
    assert_eq!(handler.on_interrupt("dirb")?, Decision::Continue);

    let mut handler = InterruptHandler::new(Cursor::new(b"a\n".to_vec()), std::io::sink());
    assert_eq!(handler.on_interrupt("dirb")?, Decision::Abort);

    // closed stdin cannot answer, stop instead of spinning
    let mut handler = InterruptHandler::new(Cursor::new(Vec::new()), std::io::sink());
    assert_eq!(handler.on_interrupt("dirb")?, Decision::Abort);
    Ok(())
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.scan.tools, strings(&["nmap", "sslscan", "nikto", "dirb"]));
    assert_eq!(config.scan.proxy, None);
    assert_eq!(config.output.dir, None);
    assert!(config.tools.binaries.is_empty());
}

#[test]
fn test_config_save_and_load() -> Result<()> {
    use tempfile::Builder;

    let mut config = Config::default();
    config.scan.tools = strings(&["nikto", "dirb"]);
    config.scan.proxy = Some("http://127.0.0.1:8080".to_string());
    config.output.dir = Some(PathBuf::from("results"));
    config
        .tools
        .binaries
        .insert("nikto".to_string(), "/opt/nikto/program/nikto.pl".to_string());

    let temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
    let temp_path = temp_file.path().to_str().unwrap();

    config.save_to_file(temp_path)?;
    let loaded_config = Config::load_from_file(temp_path)?;

    assert_eq!(loaded_config.scan.tools, config.scan.tools);
    assert_eq!(loaded_config.scan.proxy, config.scan.proxy);
    assert_eq!(loaded_config.output.dir, config.output.dir);
    assert_eq!(
        loaded_config.tools.binaries.get("nikto").map(String::as_str),
        Some("/opt/nikto/program/nikto.pl")
    );
    Ok(())
}

#[test]
fn test_partial_config_file_keeps_defaults() -> Result<()> {
    use tempfile::Builder;

    let temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
    std::fs::write(temp_file.path(), "[scan]\nproxy = \"http://10.0.0.5:3128\"\n").unwrap();

    let config = Config::load_from_file(temp_file.path().to_str().unwrap())?;
    assert_eq!(config.scan.tools, strings(&DEFAULT_TOOLS));
    assert_eq!(config.scan.proxy.as_deref(), Some("http://10.0.0.5:3128"));
    assert_eq!(config.output.dir, None);
    Ok(())
}

#[test]
fn test_cli_overrides_win() {
    let mut config = Config::default();
    config.scan.proxy = Some("http://from-file:3128".to_string());

    config.apply_overrides(Some(strings(&["nmap"])), Some(PathBuf::from("/tmp/out")), None);
    let run = config.into_run_config(RunQueue::single("https://example.com"));

    assert_eq!(run.requested_tools, strings(&["nmap"]));
    assert_eq!(run.output_dir, Some(PathBuf::from("/tmp/out")));
    assert_eq!(run.proxy.as_deref(), Some("http://from-file:3128"));
    assert_eq!(run.queue.len(), 1);
}

#[test]
fn test_time_utilities() {
    use webdisco::utils::time;

    assert_eq!(time::format_duration(Duration::from_secs(3661)), "1h 1m 1s");
    assert_eq!(time::format_duration(Duration::from_secs(61)), "1m 1s");
    assert_eq!(time::format_duration(Duration::from_secs(1)), "1s");
}

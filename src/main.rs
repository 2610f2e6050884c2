use intent_bridge::{
    app,
    config::BridgeConfig,
    shell::{handle_line, ShellOutput},
    utils::{init_logging, AppError},
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{broadcast::error::RecvError, mpsc};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화
    let _log_guard = init_logging();

    // 3. 브리지 구성
    let config = BridgeConfig::from_env()?;
    let bridge_app = app(config);

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ShellOutput>();

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(output) = out_rx.recv().await {
            let mut line = serde_json::to_vec(&output)?;
            line.push(b'\n');
            stdout.write_all(&line).await?;
            stdout.flush().await?;
        }
        Ok::<(), AppError>(())
    });

    let mut notifications = bridge_app.notifier.subscribe();
    let push_tx = out_tx.clone();
    let forwarder = tokio::spawn(async move {
        loop {
            match notifications.recv().await {
                Ok(notification) => {
                    if push_tx.send(ShellOutput::Notification(notification)).is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Push receiver lagged; pending slot stays authoritative");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // 4. 콜드 스타트 (프로세스당 한 번)
    let epoch = bridge_app.bridge.on_cold_start();
    tracing::info!(epoch = %epoch, "Host shell started");

    // 5. 입력 처리
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let output = handle_line(&bridge_app, &line);

        if out_tx.send(output).is_err() {
            break;
        }
    }

    tracing::info!("Input closed, shutting down");

    // Dropping the app closes the broadcast channel and ends the forwarder
    drop(bridge_app);
    drop(out_tx);
    if let Err(err) = forwarder.await {
        tracing::error!(error = %err, "Notification forwarder panicked");
    }
    match writer.await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(error = %err, "Output writer panicked");
            Ok(())
        }
    }
}

//! HTTP request logging middleware

/// Log every download the board makes from the sketch server
pub fn with_download_logging()
-> warp::filters::log::Log<impl Fn(warp::filters::log::Info) + Clone> {
    warp::log::custom(|info| {
        let status = info.status();
        let status_icon = match status.as_u16() {
            200..=299 => "✅",
            300..=399 => "🔀",
            400..=499 => "⚠️",
            500..=599 => "❌",
            _ => "❓",
        };

        let remote_addr = info
            .remote_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        log::info!(
            "{} {} {} {} - {} {}ms - {}",
            status_icon,
            chrono::Local::now().format("%H:%M:%S"),
            info.method(),
            info.path(),
            status,
            info.elapsed().as_millis(),
            remote_addr
        );

        if status.is_client_error() || status.is_server_error() {
            log::warn!(
                "Board request for {} from {} was not served",
                info.path(),
                remote_addr
            );
        }
    })
}

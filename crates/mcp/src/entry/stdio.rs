#![forbid(unsafe_code)]

use super::framing::{
    TransportMode, detect_mode_from_first_line, parse_request, read_content_length_frame,
    write_frame,
};
use crate::McpServer;
use std::io::{BufRead, BufReader, Write};

pub(crate) fn run_stdio(server: &mut McpServer) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();
    let mut mode: Option<TransportMode> = None;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let current = match mode {
            Some(current) => current,
            None => {
                let Some(detected) = detect_mode_from_first_line(&line) else {
                    tracing::warn!("ignoring input line before framing was established");
                    continue;
                };
                tracing::debug!(?detected, "transport framing detected");
                mode = Some(detected);
                detected
            }
        };

        let body = match current {
            TransportMode::NewlineJson => line.trim().as_bytes().to_vec(),
            TransportMode::ContentLength => {
                let Some(body) = read_content_length_frame(&mut reader, line)? else {
                    break;
                };
                body
            }
        };
        handle_body(server, &mut stdout, current, &body)?;
    }

    tracing::debug!("stdin closed, shutting down");
    Ok(())
}

fn handle_body<W: Write>(
    server: &mut McpServer,
    writer: &mut W,
    mode: TransportMode,
    body: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let response = match parse_request(body) {
        Ok(request) => server.handle(request),
        Err(error) => Some(error),
    };
    if let Some(response) = response {
        write_frame(writer, mode, &response)?;
    }
    Ok(())
}

use anyhow::Result;
use bytes::Bytes;
use futures_util::{future, stream, Stream, StreamExt};

use crate::ai::provider::StreamResponse;

/// 跨 chunk 的行缓冲
///
/// HTTP body 的 chunk 边界与行边界无关，一行（甚至一个 UTF-8 字符）可能被拆到两个 chunk 中。
/// 只有遇到 `\n` 才产出完整的一行，UTF-8 按行解码。
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn extend(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    /// 取出下一行完整的行（去掉 `\n` / `\r\n`）
    fn next_line(&mut self) -> Option<Result<String>> {
        let newline = self.pending.iter().position(|b| *b == b'\n')?;
        let mut line: Vec<u8> = self.pending.drain(..=newline).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(decode_line(line))
    }

    /// 流结束时取出剩余的未终止行
    fn take_remaining(&mut self) -> Option<Result<String>> {
        if self.pending.is_empty() {
            return None;
        }
        Some(decode_line(std::mem::take(&mut self.pending)))
    }
}

fn decode_line(line: Vec<u8>) -> Result<String> {
    String::from_utf8(line).map_err(|e| anyhow::anyhow!("UTF-8 error: {}", e))
}

/// 将字节流切分为文本行
fn split_lines<S>(body: S) -> impl Stream<Item = Result<String>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    stream::unfold(
        (Box::pin(body), LineBuffer::default(), false),
        |(mut body, mut buffer, mut finished)| async move {
            loop {
                if let Some(line) = buffer.next_line() {
                    return Some((line, (body, buffer, finished)));
                }
                if finished {
                    return None;
                }
                match body.next().await {
                    Some(Ok(chunk)) => buffer.extend(&chunk),
                    Some(Err(e)) => {
                        finished = true;
                        buffer.pending.clear();
                        // 错误信息中的 URL 可能带有敏感参数
                        let error = anyhow::anyhow!("Stream error: {}", e.without_url());
                        return Some((Err(error), (body, buffer, finished)));
                    }
                    None => {
                        finished = true;
                        let line = buffer.take_remaining()?;
                        return Some((line, (body, buffer, finished)));
                    }
                }
            }
        },
    )
}

/// SSE 流映射：将 bytes_stream 转换为提取内容的 String stream
///
/// 适用于 Gemini `streamGenerateContent?alt=sse`，每个 `data:` 行是一段 JSON。
pub fn map_sse_stream<S, F>(body: S, extract_content: F) -> impl Stream<Item = Result<String>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    F: Fn(&str) -> Option<String> + Send + 'static,
{
    split_lines(body).filter_map(move |line| {
        let item = match line {
            Ok(line) => line
                .strip_prefix("data:")
                .map(str::trim)
                .filter(|json_str| *json_str != "[DONE]")
                .and_then(|json_str| extract_content(json_str))
                .map(Ok),
            Err(e) => Some(Err(e)),
        };
        future::ready(item)
    })
}

/// 收集流式响应为完整文本
///
/// 解释器只处理完整响应，`on_chunk` 用于实时展示进度。
pub async fn collect_stream<F>(mut stream: StreamResponse, mut on_chunk: F) -> Result<String>
where
    F: FnMut(&str),
{
    let mut message = String::with_capacity(4096);

    while let Some(item) = stream.next().await {
        let chunk = item?;
        if chunk.is_empty() {
            continue;
        }
        on_chunk(&chunk);
        message.push_str(&chunk);
    }

    Ok(message)
}

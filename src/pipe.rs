//! # Batch / Streaming Interface
//!
//! [`Tokenizer::pipe`] tokenizes a sequence of texts and yields the
//! resulting documents as a finite, one-shot stream in strict input order,
//! even when internal workers complete out of order.
//!
//! ## Stages
//!
//! ```text
//! feeder ──(seq, text)──▶ workers ──(seq, result)──▶ reorder ──▶ stream
//! ```
//!
//! * The feeder pushes sequence-numbered texts into a bounded channel, so at
//!   most `batch_size` inputs are buffered at a time.
//! * Workers share the input receiver and tokenize with cloned handles, so
//!   every worker reads and warms the same segmentation cache and exception
//!   table.
//! * The reorder stage buffers completed results keyed by sequence number
//!   and releases only the next in-order document.
//!
//! ## Cancellation
//!
//! Dropping the stream closes the output channel; the reorder task's next
//! send fails and it exits, which closes the results channel, which ends the
//! workers, which ends the feeder. No task handles need to be aborted.

use std::collections::BTreeMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{mpsc, Mutex};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, instrument};

use crate::error::TokenizerResult;
use crate::token::Document;
use crate::tokenizer::Tokenizer;

/// Finite, one-shot stream of documents in input order.
pub struct DocumentStream {
    inner: ReceiverStream<TokenizerResult<Document>>,
}

impl Stream for DocumentStream {
    type Item = TokenizerResult<Document>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Tokenizer {
    /// Tokenizes `texts` with up to `concurrency` workers, buffering at most
    /// `batch_size` pending inputs, and yields documents in input order.
    ///
    /// Passing zero for either parameter selects the configured default.
    /// Must be called within a tokio runtime. Exception-table mutation is
    /// assumed to happen-before this call; mutating during an in-flight pipe
    /// has undefined precedence.
    #[instrument(skip(self, texts))]
    pub fn pipe<I>(&self, texts: I, batch_size: usize, concurrency: usize) -> DocumentStream
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: Send + 'static,
    {
        let batch_size = if batch_size == 0 {
            self.config.batch_size
        } else {
            batch_size
        }
        .max(1);
        let workers = if concurrency == 0 {
            self.config.concurrency
        } else {
            concurrency
        }
        .max(1);
        debug!(batch_size, workers, "starting pipe");

        let (input_tx, input_rx) = mpsc::channel::<(usize, String)>(batch_size);
        let (result_tx, result_rx) = mpsc::channel::<(usize, TokenizerResult<Document>)>(batch_size);
        let (output_tx, output_rx) = mpsc::channel::<TokenizerResult<Document>>(batch_size);

        // Feeder: sequence-number the inputs. Stops as soon as the workers
        // are gone (consumer dropped the stream early).
        let iter = texts.into_iter();
        tokio::spawn(async move {
            for numbered in iter.enumerate() {
                if input_tx.send(numbered).await.is_err() {
                    break;
                }
            }
        });

        // Workers: pull the next input from the shared receiver, tokenize,
        // and report the sequence-tagged result.
        let input_rx = Arc::new(Mutex::new(input_rx));
        for _ in 0..workers {
            let input_rx = input_rx.clone();
            let result_tx = result_tx.clone();
            let tokenizer = self.clone();
            tokio::spawn(async move {
                loop {
                    let next = { input_rx.lock().await.recv().await };
                    let Some((seq, text)) = next else { break };
                    if result_tx.send((seq, tokenizer.tokenize(&text))).await.is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        // Reorder: release results strictly in input-sequence order.
        tokio::spawn(async move {
            let mut pending: BTreeMap<usize, TokenizerResult<Document>> = BTreeMap::new();
            let mut next_seq = 0usize;
            let mut result_rx = result_rx;

            while let Some((seq, result)) = result_rx.recv().await {
                pending.insert(seq, result);
                while let Some(result) = pending.remove(&next_seq) {
                    if output_tx.send(result).await.is_err() {
                        return;
                    }
                    next_seq += 1;
                }
            }
        });

        DocumentStream {
            inner: ReceiverStream::new(output_rx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn test_pipe_preserves_input_order() {
        let tokenizer = Tokenizer::default();
        let texts: Vec<String> = (0..64).map(|i| format!("text number {}", i)).collect();

        let docs: Vec<_> = tokenizer.pipe(texts.clone(), 8, 4).collect().await;

        assert_eq!(docs.len(), texts.len());
        for (doc, text) in docs.iter().zip(&texts) {
            assert_eq!(doc.as_ref().unwrap().text(), text);
        }
    }

    #[tokio::test]
    async fn test_pipe_empty_input() {
        let tokenizer = Tokenizer::default();
        let docs: Vec<_> = tokenizer.pipe(Vec::new(), 4, 2).collect().await;
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_pipe_zero_hints_use_config_defaults() {
        let tokenizer = Tokenizer::default();
        let docs: Vec<_> = tokenizer
            .pipe(vec!["one".to_string(), "two".to_string()], 0, 0)
            .collect()
            .await;
        assert_eq!(docs.len(), 2);
    }
}

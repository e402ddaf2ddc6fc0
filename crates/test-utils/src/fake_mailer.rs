use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use invoicebot::notify::{Mailer, OutgoingMail, RelaySettings};

/// A fake mailer that records every mail instead of sending it.
///
/// With `failing()` every send returns an error after recording.
#[derive(Clone, Default)]
pub struct FakeMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    fail: bool,
}

impl FakeMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for FakeMailer {
    fn send<'a>(
        &'a self,
        _relay: &'a RelaySettings,
        mail: &'a OutgoingMail,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(mail.clone());
            if self.fail {
                anyhow::bail!("535 authentication rejected");
            }
            Ok(())
        })
    }
}

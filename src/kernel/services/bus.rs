use tokio::sync::mpsc::{self, error::SendError, error::TryRecvError};

#[derive(Debug)]
pub enum KernelMessage {
    Action(crate::kernel::Action),
}

#[derive(Clone, Debug)]
pub struct KernelBusSender {
    tx: mpsc::UnboundedSender<KernelMessage>,
}

#[derive(Debug)]
pub struct KernelBusReceiver {
    rx: mpsc::UnboundedReceiver<KernelMessage>,
}

pub fn kernel_bus() -> (KernelBusSender, KernelBusReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (KernelBusSender { tx }, KernelBusReceiver { rx })
}

impl KernelBusSender {
    pub fn send(&self, msg: KernelMessage) -> Result<(), SendError<KernelMessage>> {
        self.tx.send(msg)
    }

    pub fn send_action(
        &self,
        action: crate::kernel::Action,
    ) -> Result<(), SendError<KernelMessage>> {
        self.send(KernelMessage::Action(action))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl KernelBusReceiver {
    pub fn try_recv(&mut self) -> Result<KernelMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub async fn recv(&mut self) -> Option<KernelMessage> {
        self.rx.recv().await
    }
}

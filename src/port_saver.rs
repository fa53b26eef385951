use rocket::fairing::Info;
use rocket::{Orbit, Rocket};
use tokio::sync::{mpsc, Mutex};

/// Pair of a fairing that reports the bound port on liftoff and a handle to
/// wait for it, so the server can be started on port 0.
pub fn create_pair() -> (PortSaver, Port) {
    let (tx, rx) = mpsc::channel(1);
    let port_saver = PortSaver::new(tx);
    let port = Port::new(rx);
    (port_saver, port)
}

pub struct Port {
    state: Mutex<PortState>,
}

struct PortState {
    port: Option<u16>,
    rx: mpsc::Receiver<u16>,
}

impl Port {
    fn new(rx: mpsc::Receiver<u16>) -> Port {
        Port {
            state: Mutex::new(PortState { port: None, rx }),
        }
    }

    /// Waits for liftoff. `None` if the server was dropped before it bound.
    pub async fn get(&self) -> Option<u16> {
        let mut state = self.state.lock().await;
        if state.port.is_none() {
            state.port = state.rx.recv().await;
        }
        state.port
    }
}

pub struct PortSaver {
    sender: mpsc::Sender<u16>,
}

impl PortSaver {
    fn new(sender: mpsc::Sender<u16>) -> PortSaver {
        PortSaver { sender }
    }
}

#[rocket::async_trait]
impl rocket::fairing::Fairing for PortSaver {
    fn info(&self) -> Info {
        Info {
            name: "Port Saver",
            kind: rocket::fairing::Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let port = rocket.config().port;
        tracing::info!(address = %rocket.config().address, port, "Server is listening");
        if self.sender.send(port).await.is_err() {
            tracing::debug!("Nobody is waiting for the bound port");
        }
    }
}

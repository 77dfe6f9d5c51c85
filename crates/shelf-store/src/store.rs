//! # Cart Store
//!
//! The session's single authority over cart contents.
//!
//! A `CartStore` is a cheap, cloneable handle. All mutations are sent as
//! commands to one worker task that owns the cart, applies each command,
//! saves the result and publishes a fresh snapshot. Reads never touch the
//! worker: they borrow the latest snapshot.
//!
//! ```text
//!  handle ── add / remove / update / clear ──► mpsc queue ──► worker
//!    ▲                                                       │
//!    │                                  apply ─► save ─► publish
//!    └──────── cart() / cart_total() / cart_count() ◄── watch snapshot
//! ```
//!
//! `add_to_cart` carries a simulated latency. Under `CommitOrder::Fifo`
//! the worker serves the delay itself, so every mutation commits in
//! submission order. Under `CommitOrder::Deferred` each add sleeps on its
//! own timer first and later mutations can overtake it.

use crate::config::{CommitOrder, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::file::FilePersistence;
use shelf_core::{Book, BoxedCartPersistence, Cart, CartPersistence, Money};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, instrument, warn};

type Ack = oneshot::Sender<Cart>;

enum Command {
    Add {
        book: Book,
        quantity: u32,
        delay: Duration,
        ack: Ack,
    },
    Remove {
        book_id: String,
        ack: Ack,
    },
    UpdateQuantity {
        book_id: String,
        quantity: i64,
        ack: Ack,
    },
    Clear {
        ack: Ack,
    },
}

/// Handle to the session cart
#[derive(Clone)]
pub struct CartStore {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<Cart>,
    pending_adds: Arc<AtomicUsize>,
    add_delay: Duration,
    commit_order: CommitOrder,
    backend: &'static str,
}

impl CartStore {
    /// Hydrate from `persistence` and start the worker.
    ///
    /// Must be called inside a tokio runtime. An unreadable stored cart is
    /// logged and replaced by an empty one.
    #[instrument(skip_all, fields(backend = persistence.backend_name()))]
    pub async fn open(persistence: BoxedCartPersistence, config: &StoreConfig) -> Self {
        let cart = hydrate(persistence.as_ref()).await;
        let backend = persistence.backend_name();

        let (commands, queue) = mpsc::unbounded_channel();
        let (publisher, snapshot) = watch::channel(cart.clone());
        let pending_adds = Arc::new(AtomicUsize::new(0));

        let worker = CartWorker {
            cart,
            persistence,
            publisher,
            pending_adds: Arc::clone(&pending_adds),
        };
        tokio::spawn(worker.run(queue));

        info!(
            commit_order = %config.commit_order,
            add_delay_ms = config.add_delay.as_millis() as u64,
            "Cart store ready"
        );

        Self {
            commands,
            snapshot,
            pending_adds,
            add_delay: config.add_delay,
            commit_order: config.commit_order,
            backend,
        }
    }

    /// Open a store backed by `<data_dir>/<storage_key>.json`
    pub async fn open_file(config: &StoreConfig) -> StoreResult<Self> {
        let persistence = FilePersistence::new(&config.data_dir, &config.storage_key)?;
        Ok(Self::open(Arc::new(persistence), config).await)
    }

    /// Queue an add of `quantity` copies of `book`.
    ///
    /// Returns immediately; the loading flag is raised until the add has
    /// committed. Awaiting the returned future yields the cart as of that
    /// commit, but dropping it does not cancel the add.
    pub fn add_to_cart(&self, book: Book, quantity: u32) -> PendingAdd {
        let (ack, committed) = oneshot::channel();
        self.pending_adds.fetch_add(1, Ordering::SeqCst);
        debug!(book_id = %book.id, quantity, "Queueing add");

        match self.commit_order {
            CommitOrder::Fifo => {
                let command = Command::Add {
                    book,
                    quantity,
                    delay: self.add_delay,
                    ack,
                };
                if self.commands.send(command).is_err() {
                    self.pending_adds.fetch_sub(1, Ordering::SeqCst);
                }
            }
            CommitOrder::Deferred => {
                let commands = self.commands.clone();
                let pending_adds = Arc::clone(&self.pending_adds);
                let delay = self.add_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let command = Command::Add {
                        book,
                        quantity,
                        delay: Duration::ZERO,
                        ack,
                    };
                    if commands.send(command).is_err() {
                        pending_adds.fetch_sub(1, Ordering::SeqCst);
                    }
                });
            }
        }

        PendingAdd { committed }
    }

    /// Remove the line for `book_id`; no-op if absent
    pub async fn remove_from_cart(&self, book_id: impl Into<String>) -> StoreResult<Cart> {
        let book_id = book_id.into();
        self.request(|ack| Command::Remove { book_id, ack }).await
    }

    /// Set a line's quantity exactly; below 1 removes the line
    pub async fn update_quantity(
        &self,
        book_id: impl Into<String>,
        quantity: i64,
    ) -> StoreResult<Cart> {
        let book_id = book_id.into();
        self.request(|ack| Command::UpdateQuantity {
            book_id,
            quantity,
            ack,
        })
        .await
    }

    /// Empty the cart
    pub async fn clear_cart(&self) -> StoreResult<Cart> {
        self.request(|ack| Command::Clear { ack }).await
    }

    async fn request(&self, command: impl FnOnce(Ack) -> Command) -> StoreResult<Cart> {
        let (ack, committed) = oneshot::channel();
        self.commands
            .send(command(ack))
            .map_err(|_| StoreError::Closed)?;
        committed.await.map_err(|_| StoreError::Closed)
    }

    /// Snapshot of the committed cart
    pub fn cart(&self) -> Cart {
        self.snapshot.borrow().clone()
    }

    /// Sum of price times quantity over all lines
    pub fn cart_total(&self) -> Money {
        self.snapshot.borrow().total()
    }

    /// Sum of quantities over all lines
    pub fn cart_count(&self) -> u64 {
        self.snapshot.borrow().item_count()
    }

    /// True while any add is waiting out its delay
    pub fn is_loading(&self) -> bool {
        self.pending_adds.load(Ordering::SeqCst) > 0
    }

    /// Receiver notified after every commit
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.snapshot.clone()
    }

    pub fn commit_order(&self) -> CommitOrder {
        self.commit_order
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend
    }
}

/// Completion of a queued add
///
/// Resolves with the cart as committed by the add, or
/// `StoreError::Closed` if the store shut down first.
#[must_use = "the add is queued regardless; await this to observe the commit"]
pub struct PendingAdd {
    committed: oneshot::Receiver<Cart>,
}

impl Future for PendingAdd {
    type Output = StoreResult<Cart>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.committed)
            .poll(cx)
            .map(|result| result.map_err(|_| StoreError::Closed))
    }
}

async fn hydrate(persistence: &dyn CartPersistence) -> Cart {
    match persistence.load().await {
        Ok(Some(cart)) => {
            info!(lines = cart.len(), items = cart.item_count(), "Restored stored cart");
            cart
        }
        Ok(None) => {
            debug!("No stored cart, starting empty");
            Cart::new()
        }
        Err(e) => {
            warn!(error = %e, "Stored cart is unreadable, starting empty");
            Cart::new()
        }
    }
}

/// Owns the cart; the only place it is mutated
struct CartWorker {
    cart: Cart,
    persistence: BoxedCartPersistence,
    publisher: watch::Sender<Cart>,
    pending_adds: Arc<AtomicUsize>,
}

impl CartWorker {
    async fn run(mut self, mut queue: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = queue.recv().await {
            self.apply(command).await;
        }
        debug!("Cart store worker stopped");
    }

    async fn apply(&mut self, command: Command) {
        let ack = match command {
            Command::Add {
                book,
                quantity,
                delay,
                ack,
            } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                self.cart.add(&book, quantity);
                self.commit().await;
                self.pending_adds.fetch_sub(1, Ordering::SeqCst);
                debug!(book_id = %book.id, quantity, "Add committed");
                ack
            }
            Command::Remove { book_id, ack } => {
                if self.cart.remove(&book_id).is_none() {
                    debug!(%book_id, "Remove of absent book ignored");
                }
                self.commit().await;
                ack
            }
            Command::UpdateQuantity {
                book_id,
                quantity,
                ack,
            } => {
                self.cart.update_quantity(&book_id, quantity);
                self.commit().await;
                ack
            }
            Command::Clear { ack } => {
                self.cart.clear();
                self.commit().await;
                ack
            }
        };

        // Caller may have stopped waiting
        let _ = ack.send(self.cart.clone());
    }

    /// Save wholesale, then publish. A failed save keeps the in-memory cart.
    async fn commit(&mut self) {
        if let Err(e) = self.persistence.save(&self.cart).await {
            warn!(
                error = %e,
                backend = self.persistence.backend_name(),
                "Failed to persist cart"
            );
        }
        self.publisher.send_replace(self.cart.clone());
    }
}

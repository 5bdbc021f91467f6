//! Ideal functionality utilities.
//!
//! Two-party protocols are tested against ideal functionalities: a shared piece
//! of state which sees both parties' inputs at once and hands each party its
//! output. The two perspectives rendezvous on a call sequence number, which is
//! well-defined because each party submits its calls in lockstep protocol
//! order.

use futures::channel::oneshot;
use std::{
    any::Any,
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::Counter;

type BoxAny = Box<dyn Any + Send + 'static>;

#[derive(Debug, Default)]
struct Buffer {
    alice: HashMap<u32, (BoxAny, oneshot::Sender<BoxAny>)>,
    bob: HashMap<u32, (BoxAny, oneshot::Sender<BoxAny>)>,
}

/// The ideal functionality from the perspective of Alice.
#[derive(Debug, Default)]
pub struct Alice<F> {
    f: Arc<Mutex<F>>,
    buffer: Arc<Mutex<Buffer>>,
    seq: Counter,
}

impl<F> Clone for Alice<F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            buffer: self.buffer.clone(),
            seq: self.seq,
        }
    }
}

impl<F> Alice<F> {
    /// Returns a lock to the ideal functionality.
    pub fn lock(&self) -> MutexGuard<'_, F> {
        self.f.lock().unwrap()
    }

    /// Calls the ideal functionality.
    pub async fn call<C, IA, IB, OA, OB>(&mut self, input: IA, call: C) -> OA
    where
        C: FnOnce(&mut F, IA, IB) -> (OA, OB),
        IA: Send + 'static,
        IB: Send + 'static,
        OA: Send + 'static,
        OB: Send + 'static,
    {
        let seq = self.seq.next().current();

        let receiver = {
            let mut buffer = self.buffer.lock().unwrap();
            if let Some((input_bob, ret_bob)) = buffer.bob.remove(&seq) {
                let input_bob = *input_bob
                    .downcast()
                    .expect("alice received correct input type for bob");

                let (output_alice, output_bob) =
                    call(&mut self.f.lock().unwrap(), input, input_bob);

                _ = ret_bob.send(Box::new(output_bob));

                return output_alice;
            }

            let (sender, receiver) = oneshot::channel();
            buffer.alice.insert(seq, (Box::new(input), sender));
            receiver
        };

        let output_alice = receiver.await.expect("bob did not drop the channel");
        *output_alice
            .downcast()
            .expect("bob sent correct output type for alice")
    }
}

/// The ideal functionality from the perspective of Bob.
#[derive(Debug, Default)]
pub struct Bob<F> {
    f: Arc<Mutex<F>>,
    buffer: Arc<Mutex<Buffer>>,
    seq: Counter,
}

impl<F> Clone for Bob<F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            buffer: self.buffer.clone(),
            seq: self.seq,
        }
    }
}

impl<F> Bob<F> {
    /// Returns a lock to the ideal functionality.
    pub fn lock(&self) -> MutexGuard<'_, F> {
        self.f.lock().unwrap()
    }

    /// Calls the ideal functionality.
    pub async fn call<C, IA, IB, OA, OB>(&mut self, input: IB, call: C) -> OB
    where
        C: FnOnce(&mut F, IA, IB) -> (OA, OB),
        IA: Send + 'static,
        IB: Send + 'static,
        OA: Send + 'static,
        OB: Send + 'static,
    {
        let seq = self.seq.next().current();

        let receiver = {
            let mut buffer = self.buffer.lock().unwrap();
            if let Some((input_alice, ret_alice)) = buffer.alice.remove(&seq) {
                let input_alice = *input_alice
                    .downcast()
                    .expect("bob received correct input type for alice");

                let (output_alice, output_bob) =
                    call(&mut self.f.lock().unwrap(), input_alice, input);

                _ = ret_alice.send(Box::new(output_alice));

                return output_bob;
            }

            let (sender, receiver) = oneshot::channel();
            buffer.bob.insert(seq, (Box::new(input), sender));
            receiver
        };

        let output_bob = receiver.await.expect("alice did not drop the channel");
        *output_bob
            .downcast()
            .expect("alice sent correct output type for bob")
    }
}

/// Creates an ideal functionality, returning the perspectives of Alice and Bob.
pub fn ideal_f2p<F>(f: F) -> (Alice<F>, Bob<F>) {
    let f = Arc::new(Mutex::new(f));
    let buffer = Arc::new(Mutex::new(Buffer::default()));

    (
        Alice {
            f: f.clone(),
            buffer: buffer.clone(),
            seq: Counter::default(),
        },
        Bob {
            f,
            buffer,
            seq: Counter::default(),
        },
    )
}

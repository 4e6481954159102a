//! Scripted launcher for tests that must not depend on an installed engine.
use std::sync::Mutex;

use super::{Invocation, LaunchOutput, Launcher};

type Responder = Box<dyn Fn(&Invocation) -> LaunchOutput + Send + Sync>;

/// Answers every invocation through a responder closure and records it.
pub(crate) struct ScriptedLauncher {
    responder: Responder,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedLauncher {
    pub(crate) fn new(responder: impl Fn(&Invocation) -> LaunchOutput + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }
}

impl Launcher for ScriptedLauncher {
    async fn launch(&self, invocation: &Invocation) -> std::io::Result<LaunchOutput> {
        self.invocations.lock().unwrap().push(invocation.clone());
        Ok((self.responder)(invocation))
    }
}

pub(crate) fn ok(stdout: &str) -> LaunchOutput {
    LaunchOutput {
        code: Some(0),
        stdout: format!("{stdout}\n").into_bytes(),
        stderr: Vec::new(),
    }
}

pub(crate) fn failed(code: i32, stderr: &str) -> LaunchOutput {
    LaunchOutput {
        code: Some(code),
        stdout: Vec::new(),
        stderr: format!("{stderr}\n").into_bytes(),
    }
}

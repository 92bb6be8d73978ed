use crate::net::app::AppCtx;
use crate::net::{DeviceId, Message, NodeId, Sim};
use crate::runtime::{EventSet, Runtime};

///
/// The event set driving a [`Sim`].
///
#[derive(Debug)]
pub enum NetEvents {
    /// An installed application reaches its start time.
    AppStart(AppStartEvent),
    /// An installed application reaches its stop time.
    AppStop(AppStopEvent),
    /// A message finishes its transit and reaches the destination device.
    MessageDelivered(MessageDeliveredEvent),
    /// A self-scheduled application timer fires.
    Timer(TimerEvent),
}

impl EventSet<Sim> for NetEvents {
    fn handle(self, rt: &mut Runtime<Sim>) {
        match self {
            Self::AppStart(event) => event.handle(rt),
            Self::AppStop(event) => event.handle(rt),
            Self::MessageDelivered(event) => event.handle(rt),
            Self::Timer(event) => event.handle(rt),
        }
    }
}

#[derive(Debug)]
pub struct AppStartEvent {
    pub(crate) node: NodeId,
}

impl AppStartEvent {
    fn handle(self, rt: &mut Runtime<Sim>) {
        let Some(app) = rt.app.activate(self.node) else {
            return;
        };

        tracing::info!(node = %self.node, time = %rt.sim_time(), "application starting");
        app.borrow_mut().start(&mut AppCtx {
            node: self.node,
            rt,
        });
    }
}

#[derive(Debug)]
pub struct AppStopEvent {
    pub(crate) node: NodeId,
}

impl AppStopEvent {
    fn handle(self, rt: &mut Runtime<Sim>) {
        let Some(app) = rt.app.deactivate(self.node) else {
            return;
        };

        tracing::info!(node = %self.node, time = %rt.sim_time(), "application stopping");
        app.borrow_mut().stop(&mut AppCtx {
            node: self.node,
            rt,
        });
    }
}

#[derive(Debug)]
pub struct MessageDeliveredEvent {
    pub(crate) device: DeviceId,
    pub(crate) message: Message,
}

impl MessageDeliveredEvent {
    fn handle(self, rt: &mut Runtime<Sim>) {
        let Some(node) = rt.app.topology().device(self.device).map(|dev| dev.node()) else {
            tracing::warn!(device = %self.device, "dropping message for unknown device");
            return;
        };

        // Inbound traffic outside the application's active window is
        // dropped, not errored.
        let Some(app) = rt.app.deliver(node) else {
            tracing::debug!(
                node = %node,
                msg = %self.message.str(),
                "message dropped, no active application"
            );
            return;
        };

        tracing::trace!(node = %node, msg = %self.message.str(), "delivering message");
        app.borrow_mut()
            .recv(&mut AppCtx { node, rt }, self.message);
    }
}

#[derive(Debug)]
pub struct TimerEvent {
    pub(crate) node: NodeId,
}

impl TimerEvent {
    fn handle(self, rt: &mut Runtime<Sim>) {
        // A timer outliving its application's window is inert.
        let Some(app) = rt.app.active_app(self.node) else {
            tracing::debug!(node = %self.node, "timer dropped, application inactive");
            return;
        };

        app.borrow_mut().timer(&mut AppCtx {
            node: self.node,
            rt,
        });
    }
}

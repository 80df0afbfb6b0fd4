// crates/sirsi-rpc/src/handlers/notification.rs

use sirsi_facade::messages::*;
use sirsi_facade::ControlPlane;

use crate::router::RpcRouter;

use super::NOTIFICATION_SERVICE;

pub fn register(router: &mut RpcRouter, plane: &ControlPlane) {
    router
        .service(NOTIFICATION_SERVICE)
        .with_state(plane.clone())
        .method(
            "SendNotification",
            |p: ControlPlane, req: SendNotificationRequest| async move {
                p.send_notification(req).await
            },
        )
        .method(
            "ListNotifications",
            |p: ControlPlane, req: ListNotificationsRequest| async move {
                p.list_notifications(req).await
            },
        );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use clinica_common::models::{ApiResponse, AppointmentPayload, AppointmentStatus};
    use proptest::prelude::*;

    use crate::mock::{ApiCall, MockSchedulingApi};
    use crate::negotiator::{ConflictNegotiator, NegotiationState};

    fn status_strategy() -> impl Strategy<Value = Option<AppointmentStatus>> {
        prop_oneof![
            Just(None),
            Just(Some(AppointmentStatus::Scheduled)),
            Just(Some(AppointmentStatus::Confirmed)),
        ]
    }

    prop_compose! {
        fn payload_strategy()(
            patient in "pat-[a-z0-9]{1,12}",
            professional in "pro-[a-z0-9]{1,12}",
            room in proptest::option::of("room-[0-9]{1,3}"),
            minutes_from_epoch in 0..(60 * 24 * 365 * 5i64),
            duration in 5..240i64,
            notes in proptest::option::of(".{0,40}"),
            status in status_strategy(),
        ) -> AppointmentPayload {
            let origin = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
            AppointmentPayload {
                patient_id: patient,
                professional_id: professional,
                room_id: room,
                start_time: origin + Duration::minutes(minutes_from_epoch),
                duration_minutes: duration,
                notes,
                status,
            }
        }
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build test runtime")
    }

    proptest! {
        // Confirming a conflict resubmits exactly the parked payload, forced
        #[test]
        fn test_confirm_resubmits_unchanged_payload(payload in payload_strategy(), update in any::<bool>()) {
            let api = Arc::new(MockSchedulingApi::new());
            api.push_write(ApiResponse::conflict("overlap"));
            let mut negotiator = ConflictNegotiator::new(Arc::clone(&api));

            runtime().block_on(async {
                if update {
                    negotiator.update_appointment("apt-1", payload.clone()).await.unwrap();
                } else {
                    negotiator.create_appointment(payload.clone()).await.unwrap();
                }
                negotiator.confirm_conflict().await.unwrap();
            });

            let calls = api.calls();
            prop_assert_eq!(calls.len(), 2);
            let forced = if update {
                ApiCall::Update { appointment_id: "apt-1".to_string(), payload: payload.clone(), force: true }
            } else {
                ApiCall::Create { payload: payload.clone(), force: true }
            };
            prop_assert_eq!(&calls[1], &forced);
            prop_assert_eq!(negotiator.state(), NegotiationState::Resolved);
        }

        // Cancelling never produces a second request
        #[test]
        fn test_cancel_never_sends(payload in payload_strategy()) {
            let api = Arc::new(MockSchedulingApi::new());
            api.push_write(ApiResponse::conflict("overlap"));
            let mut negotiator = ConflictNegotiator::new(Arc::clone(&api));

            runtime().block_on(negotiator.create_appointment(payload)).unwrap();
            negotiator.cancel_conflict().unwrap();

            prop_assert_eq!(api.call_count(), 1);
            prop_assert_eq!(negotiator.state(), NegotiationState::Idle);
        }
    }
}

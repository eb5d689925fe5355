//! Default catalog installed for new tenants.

use crate::catalog::domain::{
    AssigneeKind, DutyCategory, DutyDefinitionDraft, LocationDraft, LocationType, RiskLevel,
    RoleDraft, TimeSlotDraft,
};
use chrono::{NaiveTime, TimeDelta, Weekday};

/// Default duty with the codes of its default slot and location.
pub(super) struct DefaultDuty {
    pub(super) draft: DutyDefinitionDraft,
    pub(super) slot_code: &'static str,
    pub(super) location_code: &'static str,
}

fn at(hour: i64, minute: i64) -> NaiveTime {
    NaiveTime::MIN + TimeDelta::minutes(hour * 60 + minute)
}

pub(super) fn time_slots() -> Vec<TimeSlotDraft> {
    vec![
        TimeSlotDraft::new("MORNING_GATE", "Morning Gate", at(7, 0), at(7, 45)),
        TimeSlotDraft::new("ASSEMBLY", "Monday Assembly", at(7, 45), at(8, 15))
            .with_weekdays([Weekday::Mon]),
        TimeSlotDraft::new("EXAM_MORNING", "Morning Exam Session", at(9, 0), at(12, 0)),
        TimeSlotDraft::new("RECESS", "Recess", at(10, 15), at(10, 45)),
        TimeSlotDraft::new("LUNCH", "Lunch Break", at(12, 30), at(13, 15)),
        TimeSlotDraft::new("DISMISSAL", "Dismissal", at(14, 30), at(15, 30)),
    ]
}

pub(super) fn locations() -> Vec<LocationDraft> {
    vec![
        LocationDraft::new("MAIN_GATE", "Main Gate", LocationType::Gate),
        LocationDraft::new("PLAYGROUND", "Playground", LocationType::Field),
        LocationDraft::new("EXAM_HALL", "Examination Hall", LocationType::Hall),
        LocationDraft::new("ASSEMBLY_HALL", "Assembly Hall", LocationType::Hall),
        LocationDraft::new("BUS_BAY", "Bus Bay", LocationType::TransportBay),
        LocationDraft::new("LIBRARY", "Library", LocationType::Other),
    ]
}

pub(super) fn roles() -> Vec<RoleDraft> {
    vec![
        RoleDraft::new("LEAD", "Lead"),
        RoleDraft::new("ASSISTANT", "Assistant"),
        RoleDraft::new("SUPERVISOR", "Supervisor"),
    ]
}

pub(super) fn duties() -> Vec<DefaultDuty> {
    use AssigneeKind::{Staff, Student, Teacher};

    vec![
        DefaultDuty {
            draft: DutyDefinitionDraft::new(
                "GATE_DUTY",
                "Morning Gate Duty",
                DutyCategory::Operational,
                [Teacher, Staff],
            )
            .with_risk_level(RiskLevel::Medium)
            .with_assignee_bounds(Some(1), Some(2)),
            slot_code: "MORNING_GATE",
            location_code: "MAIN_GATE",
        },
        DefaultDuty {
            draft: DutyDefinitionDraft::new(
                "RECESS_SUPERVISION",
                "Recess Supervision",
                DutyCategory::Operational,
                [Teacher, Staff],
            )
            .with_assignee_bounds(Some(1), Some(4)),
            slot_code: "RECESS",
            location_code: "PLAYGROUND",
        },
        DefaultDuty {
            draft: DutyDefinitionDraft::new(
                "EXAM_INVIGILATION",
                "Exam Invigilation",
                DutyCategory::Exam,
                [Teacher],
            )
            .with_risk_level(RiskLevel::High)
            .with_supervisor_required()
            .with_assignee_bounds(Some(1), Some(3)),
            slot_code: "EXAM_MORNING",
            location_code: "EXAM_HALL",
        },
        DefaultDuty {
            draft: DutyDefinitionDraft::new(
                "BUS_DUTY",
                "Bus Duty",
                DutyCategory::Transport,
                [Teacher, Staff],
            )
            .with_risk_level(RiskLevel::High)
            .with_supervisor_required()
            .with_assignee_bounds(None, Some(3)),
            slot_code: "DISMISSAL",
            location_code: "BUS_BAY",
        },
        DefaultDuty {
            draft: DutyDefinitionDraft::new(
                "ASSEMBLY_DUTY",
                "Assembly Duty",
                DutyCategory::Event,
                [Teacher, Staff, Student],
            )
            .with_assignee_bounds(None, Some(6))
            .with_student_weekly_cap(1),
            slot_code: "ASSEMBLY",
            location_code: "ASSEMBLY_HALL",
        },
        DefaultDuty {
            draft: DutyDefinitionDraft::new(
                "LIBRARY_MONITOR",
                "Library Monitor Prefect",
                DutyCategory::StudentLeadership,
                [Student],
            )
            .with_assignee_bounds(None, Some(2))
            .with_student_weekly_cap(3),
            slot_code: "LUNCH",
            location_code: "LIBRARY",
        },
    ]
}

//! Diesel schema for planning persistence.

diesel::table! {
    /// Plans.
    plans (plan_id) {
        /// Store-assigned identifier.
        plan_id -> Int8,
        /// Short plan name.
        #[max_length = 255]
        name -> Varchar,
        /// Detailed description.
        description -> Text,
        /// Lifecycle state (`ACTIVE`, `COMPLETED`, `ARCHIVED`).
        #[max_length = 20]
        status -> Varchar,
        /// Overall confidence, 0 to 100.
        confident -> Int2,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Uncertainties attached to plans.
    uncertainties (uncertainty_id) {
        /// Store-assigned identifier.
        uncertainty_id -> Int8,
        /// Owning plan.
        plan_id -> Int8,
        /// What is not yet known.
        description -> Text,
        /// Confidence, 0 to 100.
        confidence -> Int2,
        /// Planned resolution steps.
        actions_to_resolve -> Text,
        /// Research findings.
        actions_result -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Todos attached to plans.
    todos (todo_id) {
        /// Store-assigned identifier.
        todo_id -> Int8,
        /// Owning plan.
        plan_id -> Int8,
        /// What to do.
        description -> Text,
        /// Urgency (`LOW`, `MEDIUM`, `HIGH`).
        #[max_length = 20]
        priority -> Varchar,
        /// Progress (`TODO`, `IN_PROGRESS`, `DONE`).
        #[max_length = 20]
        status -> Varchar,
        /// Outcome report.
        report -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(uncertainties -> plans (plan_id));
diesel::joinable!(todos -> plans (plan_id));

diesel::allow_tables_to_appear_in_same_query!(plans, uncertainties, todos);

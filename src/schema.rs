diesel::table! {
    shop_hours (id) {
        id -> Uuid,
        shop_id -> Uuid,
        day_of_week -> Int2,
        start_time -> Varchar,
        end_time -> Varchar,
        is_open -> Bool,
    }
}

diesel::table! {
    staff_hours (id) {
        id -> Uuid,
        shop_id -> Uuid,
        staff_id -> Uuid,
        day_of_week -> Int2,
        start_time -> Varchar,
        end_time -> Varchar,
    }
}

diesel::table! {
    appointments (id) {
        id -> Uuid,
        shop_id -> Uuid,
        staff_id -> Nullable<Uuid>,
        client_name -> Varchar,
        date -> Varchar,
        time -> Varchar,
        duration_minutes -> Int4,
        status -> Varchar,
        notes -> Varchar,
        source_appointment_id -> Nullable<Uuid>,
    }
}

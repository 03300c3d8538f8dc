use chrono::NaiveDate;
use intern_core::db::open_db_in_memory;
use intern_core::repo::intern_repo::{decode_collection, encode_collection, INTERNS_KEY};
use intern_core::{
    AttachmentKind, ContractRenewal, Department, InternFields, InternPatch, InternRepository,
    KeyValueStore, KvInternRepository, MemoryKvStore, RenewalDuration, RepoError,
    SqliteKvStore, StoreError, ValidationError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn jane_doe() -> InternFields {
    InternFields::new("Doe", "Jane", date(1999, 1, 1), Department::Marketing)
}

fn full_fields() -> InternFields {
    InternFields {
        mentor: Some("M. Kone".to_string()),
        email: Some("jane.doe@example.com".to_string()),
        phone: Some("+2250701020304".to_string()),
        social_security_number: Some("CNPS-001".to_string()),
        entry_date: Some(date(2025, 3, 1)),
        end_date: Some(date(2025, 9, 1)),
        id_document_ref: Some("file:///docs/cni.jpg".to_string()),
        birth_cert_ref: Some("file:///docs/extrait.jpg".to_string()),
        resume_ref: Some("file:///docs/cv.jpg".to_string()),
        ..jane_doe()
    }
}

#[test]
fn create_then_list_returns_record_with_created_history() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);

    let fields = full_fields();
    let created = repo.create(fields.clone()).unwrap();

    let listed = repo.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
    assert_eq!(listed[0].fields(), fields);
    assert_eq!(listed[0].history.len(), 1);
    assert_eq!(listed[0].history[0].description, "created");
    assert!(!listed[0].id.is_empty());
}

#[test]
fn list_on_empty_store_is_empty() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn create_assigns_unique_ids_and_keeps_insertion_order() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);

    let mut ids = Vec::new();
    for name in ["Alpha", "Bravo", "Charlie"] {
        let mut fields = jane_doe();
        fields.last_name = name.to_string();
        ids.push(repo.create(fields).unwrap().id);
    }

    let listed: Vec<_> = repo.list().unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(listed, ids);
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
}

#[test]
fn update_merges_partial_fields_and_appends_history() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);
    let created = repo.create(full_fields()).unwrap();

    let patch = InternPatch {
        department: Some(Department::Juridique),
        phone: Some(None),
        mentor: Some(Some("A. Traore".to_string())),
        ..InternPatch::default()
    };
    let updated = repo.update(&created.id, patch, "dept change").unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.department, Department::Juridique);
    assert_eq!(updated.phone, None);
    assert_eq!(updated.mentor.as_deref(), Some("A. Traore"));
    assert_eq!(updated.last_name, created.last_name);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.resume_ref, created.resume_ref);
    assert_eq!(updated.history.len(), created.history.len() + 1);
    assert_eq!(updated.history[0], created.history[0]);
    assert_eq!(updated.history.last().unwrap().description, "dept change");

    assert_eq!(repo.list().unwrap(), vec![updated]);
}

#[test]
fn update_unknown_id_returns_not_found_and_leaves_store_untouched() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);
    repo.create(jane_doe()).unwrap();
    let before = store.get(INTERNS_KEY).unwrap();

    let err = repo
        .update("missing", InternPatch::default(), "noop")
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(ref id) if id == "missing"));
    assert_eq!(store.get(INTERNS_KEY).unwrap(), before);
}

#[test]
fn update_rejecting_merged_record_does_not_persist() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);
    let created = repo.create(jane_doe()).unwrap();

    let patch = InternPatch {
        email: Some(Some("not-an-email".to_string())),
        ..InternPatch::default()
    };
    let err = repo.update(&created.id, patch, "bad email").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidEmail(_))
    ));

    let stored = repo.get(&created.id).unwrap().unwrap();
    assert_eq!(stored, created);
}

#[test]
fn delete_removes_record_and_is_idempotent() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);
    let keep = repo.create(jane_doe()).unwrap();
    let mut other = jane_doe();
    other.last_name = "Smith".to_string();
    let gone = repo.create(other).unwrap();

    repo.delete(&gone.id).unwrap();
    let listed = repo.list().unwrap();
    assert_eq!(listed, vec![keep.clone()]);

    repo.delete(&gone.id).unwrap();
    assert_eq!(repo.list().unwrap(), vec![keep]);
}

#[test]
fn delete_on_empty_store_does_not_write() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);

    repo.delete("anything").unwrap();
    assert!(store.is_empty());
}

#[test]
fn clear_attachment_only_touches_requested_slot() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);
    let created = repo.create(full_fields()).unwrap();

    let updated = repo
        .clear_attachment(&created.id, AttachmentKind::IdDocument)
        .unwrap();

    assert_eq!(updated.attachment(AttachmentKind::IdDocument), None);
    assert_eq!(updated.birth_cert_ref, created.birth_cert_ref);
    assert_eq!(updated.resume_ref, created.resume_ref);
    assert_eq!(updated.history.len(), 2);
    assert_eq!(
        updated.history[1].description,
        "cleared attachment: idDocument"
    );
    assert_eq!(repo.get(&created.id).unwrap().unwrap(), updated);
}

#[test]
fn clear_attachment_unknown_id_returns_not_found() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);

    let err = repo
        .clear_attachment("missing", AttachmentKind::Resume)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn create_rejects_invalid_fields_without_writing() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);

    let mut empty_name = jane_doe();
    empty_name.last_name = String::new();
    assert!(matches!(
        repo.create(empty_name),
        Err(RepoError::Validation(ValidationError::EmptyLastName))
    ));

    let mut renewal_without_duration = jane_doe();
    renewal_without_duration.contract_renewal = Some(ContractRenewal::Yes);
    renewal_without_duration.entry_date = Some(date(2025, 1, 1));
    assert!(matches!(
        repo.create(renewal_without_duration),
        Err(RepoError::Validation(
            ValidationError::MissingRenewalDuration
        ))
    ));

    let mut bad_email = jane_doe();
    bad_email.email = Some("not-an-email".to_string());
    assert!(matches!(
        repo.create(bad_email),
        Err(RepoError::Validation(ValidationError::InvalidEmail(_)))
    ));

    let missing_department = InternFields {
        department: None,
        ..jane_doe()
    };
    assert!(matches!(
        repo.create(missing_department),
        Err(RepoError::Validation(ValidationError::MissingDepartment))
    ));

    assert!(store.is_empty());
}

#[test]
fn renewal_yes_derives_end_date_and_recomputes_on_entry_change() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);

    let mut fields = jane_doe();
    fields.contract_renewal = Some(ContractRenewal::Yes);
    fields.renewal_duration = Some(RenewalDuration::ThreeMonths);
    fields.entry_date = Some(date(2025, 1, 15));
    let created = repo.create(fields).unwrap();
    assert_eq!(created.end_date, Some(date(2025, 4, 15)));

    let moved = repo
        .update(
            &created.id,
            InternPatch {
                entry_date: Some(Some(date(2025, 2, 1))),
                ..InternPatch::default()
            },
            "entry moved",
        )
        .unwrap();
    assert_eq!(moved.end_date, Some(date(2025, 5, 1)));

    let longer = repo
        .update(
            &created.id,
            InternPatch {
                renewal_duration: Some(Some(RenewalDuration::SixMonths)),
                ..InternPatch::default()
            },
            "longer renewal",
        )
        .unwrap();
    assert_eq!(longer.end_date, Some(date(2025, 8, 1)));
}

#[test]
fn explicit_end_date_on_renewed_record_is_kept_until_renewal_inputs_change() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);

    let mut fields = jane_doe();
    fields.contract_renewal = Some(ContractRenewal::Yes);
    fields.renewal_duration = Some(RenewalDuration::ThreeMonths);
    fields.entry_date = Some(date(2025, 1, 15));
    let created = repo.create(fields).unwrap();
    assert_eq!(created.end_date, Some(date(2025, 4, 15)));

    let extended = repo
        .update(
            &created.id,
            InternPatch {
                end_date: Some(Some(date(2025, 12, 31))),
                ..InternPatch::default()
            },
            "extend end date",
        )
        .unwrap();
    assert_eq!(extended.end_date, Some(date(2025, 12, 31)));
    assert_eq!(repo.get(&created.id).unwrap().unwrap(), extended);

    let renamed = repo
        .update(
            &created.id,
            InternPatch {
                first_names: Some("Janet".to_string()),
                ..InternPatch::default()
            },
            "rename",
        )
        .unwrap();
    assert_eq!(renamed.end_date, Some(date(2025, 12, 31)));

    let rederived = repo
        .update(
            &created.id,
            InternPatch {
                renewal_duration: Some(Some(RenewalDuration::OneMonth)),
                ..InternPatch::default()
            },
            "shorter renewal",
        )
        .unwrap();
    assert_eq!(rederived.end_date, Some(date(2025, 2, 15)));

    let err = repo
        .update(
            &created.id,
            InternPatch {
                end_date: Some(Some(date(2024, 12, 31))),
                ..InternPatch::default()
            },
            "end before entry",
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EndDateBeforeEntryDate { .. })
    ));
}

#[test]
fn unrepresentable_renewal_end_date_does_not_preempt_earlier_rules() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);

    let mut fields = jane_doe();
    fields.contract_renewal = Some(ContractRenewal::Yes);
    fields.renewal_duration = Some(RenewalDuration::SixMonths);
    fields.entry_date = Some(NaiveDate::MAX);

    let mut unnamed = fields.clone();
    unnamed.last_name = String::new();
    assert!(matches!(
        repo.create(unnamed),
        Err(RepoError::Validation(ValidationError::EmptyLastName))
    ));
    assert!(matches!(
        repo.create(fields),
        Err(RepoError::Validation(ValidationError::EndDateOutOfRange { months: 6, .. }))
    ));
    assert!(store.is_empty());
}

#[test]
fn renewal_switched_to_no_clears_duration_but_keeps_end_date() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);

    let mut fields = jane_doe();
    fields.contract_renewal = Some(ContractRenewal::Yes);
    fields.renewal_duration = Some(RenewalDuration::OneMonth);
    fields.entry_date = Some(date(2025, 6, 1));
    let created = repo.create(fields).unwrap();
    assert_eq!(created.end_date, Some(date(2025, 7, 1)));

    let updated = repo
        .update(
            &created.id,
            InternPatch {
                contract_renewal: Some(Some(ContractRenewal::No)),
                ..InternPatch::default()
            },
            "renewal cancelled",
        )
        .unwrap();
    assert_eq!(updated.contract_renewal, Some(ContractRenewal::No));
    assert_eq!(updated.renewal_duration, None);
    assert_eq!(updated.end_date, Some(date(2025, 7, 1)));
}

#[test]
fn corrupt_blob_surfaces_and_is_not_overwritten() {
    let store = MemoryKvStore::new();
    store.set(INTERNS_KEY, "{not json").unwrap();
    let repo = KvInternRepository::new(&store);

    assert!(matches!(repo.list(), Err(RepoError::CorruptData(_))));
    assert!(matches!(repo.create(jane_doe()), Err(RepoError::CorruptData(_))));
    assert!(matches!(repo.delete("x"), Err(RepoError::CorruptData(_))));
    assert_eq!(store.get(INTERNS_KEY).unwrap().as_deref(), Some("{not json"));
}

#[test]
fn unknown_department_in_store_is_corrupt_data() {
    let store = MemoryKvStore::new();
    store
        .set(
            INTERNS_KEY,
            r#"[{"id":"1","lastName":"Doe","firstNames":"Jane","birthDate":"1999-01-01","department":"SALES"}]"#,
        )
        .unwrap();
    let repo = KvInternRepository::new(&store);

    assert!(matches!(repo.list(), Err(RepoError::CorruptData(_))));
}

#[test]
fn duplicate_ids_in_store_are_corrupt_data() {
    let record = r#"{"id":"1","lastName":"Doe","firstNames":"Jane","birthDate":"1999-01-01","department":"RH"}"#;
    let err = decode_collection(&format!("[{record},{record}]")).unwrap_err();
    assert!(matches!(err, RepoError::CorruptData(ref msg) if msg.contains("duplicate")));
}

#[test]
fn legacy_records_without_history_load() {
    let store = MemoryKvStore::new();
    store
        .set(
            INTERNS_KEY,
            r#"[{"id":"1700000000000","lastName":"Doe","firstNames":"Jane","birthDate":"1999-01-01","department":"CREDIT SUPPORT"}]"#,
        )
        .unwrap();
    let repo = KvInternRepository::new(&store);

    let listed = repo.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].department, Department::CreditSupport);
    assert!(listed[0].history.is_empty());

    let updated = repo
        .update("1700000000000", InternPatch::default(), "touched")
        .unwrap();
    assert_eq!(updated.history.len(), 1);
}

#[test]
fn offline_store_yields_storage_unavailable_without_partial_writes() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);
    let created = repo.create(jane_doe()).unwrap();
    let before = store.get(INTERNS_KEY).unwrap();

    store.set_offline(true);
    assert!(matches!(
        repo.list(),
        Err(RepoError::StorageUnavailable(StoreError::Unavailable(_)))
    ));
    assert!(matches!(
        repo.update(&created.id, InternPatch::default(), "offline"),
        Err(RepoError::StorageUnavailable(_))
    ));
    assert!(matches!(
        repo.delete(&created.id),
        Err(RepoError::StorageUnavailable(_))
    ));

    store.set_offline(false);
    assert_eq!(store.get(INTERNS_KEY).unwrap(), before);
}

#[test]
fn collection_roundtrip_preserves_order_and_values() {
    let store = MemoryKvStore::new();
    let repo = KvInternRepository::new(&store);
    repo.create(full_fields()).unwrap();
    let mut second = jane_doe();
    second.last_name = "Kouassi".to_string();
    second.department = Some(Department::AppuieTechnique);
    repo.create(second).unwrap();

    let records = repo.list().unwrap();
    let encoded = encode_collection(&records).unwrap();
    let decoded = decode_collection(&encoded).unwrap();
    assert_eq!(decoded, records);
}

#[test]
fn doe_scenario_over_sqlite_store() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let repo = KvInternRepository::new(&store);

    let a = repo.create(jane_doe()).unwrap();
    let listed = repo.list().unwrap();
    assert_eq!(listed, vec![a.clone()]);
    assert_eq!(listed[0].history.len(), 1);
    assert_eq!(listed[0].history[0].description, "created");

    let updated = repo
        .update(
            &a.id,
            InternPatch {
                department: Some(Department::Juridique),
                ..InternPatch::default()
            },
            "dept change",
        )
        .unwrap();
    assert_eq!(updated.department, Department::Juridique);
    assert_eq!(updated.history.len(), 2);

    repo.delete(&a.id).unwrap();
    assert!(repo.list().unwrap().is_empty());
}

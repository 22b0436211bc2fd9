use std::sync::atomic::{AtomicUsize, Ordering};

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::{Arguments, Database, Decode, Encode, Row, Type};
use sqlx_null::Custom;
use sqlx_null_test::new;

// Stored as a comma-separated list; an empty list is rejected by the decoder.
#[derive(Debug, Clone, Default, PartialEq)]
struct Tags(Vec<String>);

impl Type<Sqlite> for Tags {
    fn type_info() -> <Sqlite as Database>::TypeInfo {
        <String as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &<Sqlite as Database>::TypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Tags {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <String as Encode<'q, Sqlite>>::encode(self.0.join(","), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Tags {
    fn decode(value: <Sqlite as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        let text = <&str as Decode<'r, Sqlite>>::decode(value)?;

        if text.is_empty() {
            return Err("empty tag list".into());
        }

        Ok(Tags(text.split(',').map(str::to_owned).collect()))
    }
}

static OPAQUE_DECODES: AtomicUsize = AtomicUsize::new(0);

// Counts decodes and refuses to be encoded.
#[derive(Debug, Default, PartialEq)]
struct Opaque(i64);

impl Type<Sqlite> for Opaque {
    fn type_info() -> <Sqlite as Database>::TypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &<Sqlite as Database>::TypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Opaque {
    fn encode_by_ref(
        &self,
        _buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        Err("opaque values cannot be bound".into())
    }
}

impl<'r> Decode<'r, Sqlite> for Opaque {
    fn decode(value: <Sqlite as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        OPAQUE_DECODES.fetch_add(1, Ordering::SeqCst);

        <i64 as Decode<'r, Sqlite>>::decode(value).map(Opaque)
    }
}

fn tags(list: &[&str]) -> Tags {
    Tags(list.iter().map(|&s| s.to_owned()).collect())
}

#[tokio::test]
async fn it_decodes_through_the_user_type() -> anyhow::Result<()> {
    let mut conn = new::<Sqlite>().await?;

    let value: Custom<Tags> = sqlx::query_scalar("SELECT 'red,green'")
        .fetch_one(&mut conn)
        .await?;

    assert!(value.is_set());
    assert_eq!(value.val(), &tags(&["red", "green"]));

    let value: Custom<Tags> = sqlx::query_scalar("SELECT NULL")
        .fetch_one(&mut conn)
        .await?;

    assert!(!value.is_set());
    assert_eq!(value.val(), &Tags::default());

    Ok(())
}

#[tokio::test]
async fn it_round_trips_through_the_database() -> anyhow::Result<()> {
    let mut conn = new::<Sqlite>().await?;

    for value in [Custom::new(tags(&["a", "b", "c"])), Custom::null()] {
        let returned: Custom<Tags> = sqlx::query_scalar("SELECT ?")
            .bind(value.clone())
            .fetch_one(&mut conn)
            .await?;

        assert_eq!(returned, value);
    }

    Ok(())
}

#[tokio::test]
async fn it_never_consults_the_user_type_for_null() -> anyhow::Result<()> {
    let mut conn = new::<Sqlite>().await?;

    let before = OPAQUE_DECODES.load(Ordering::SeqCst);

    let value: Custom<Opaque> = sqlx::query_scalar("SELECT NULL")
        .fetch_one(&mut conn)
        .await?;

    assert!(!value.is_set());
    assert_eq!(OPAQUE_DECODES.load(Ordering::SeqCst), before);

    // binding goes straight to NULL; the failing encoder is never reached
    let mut args = SqliteArguments::default();
    args.add(value).map_err(|e| anyhow::anyhow!(e))?;
    assert_eq!(args.len(), 1);

    let is_null: bool = sqlx::query_scalar("SELECT ? IS NULL")
        .bind(Custom::<Opaque>::null())
        .fetch_one(&mut conn)
        .await?;

    assert!(is_null);

    let value: Custom<Opaque> = sqlx::query_scalar("SELECT 42")
        .fetch_one(&mut conn)
        .await?;

    assert_eq!(value, Custom::new(Opaque(42)));
    assert_eq!(OPAQUE_DECODES.load(Ordering::SeqCst), before + 1);

    Ok(())
}

#[test]
fn it_propagates_encode_errors_verbatim() {
    let mut args = SqliteArguments::default();

    let error = args.add(Custom::new(Opaque(1))).unwrap_err();

    assert_eq!(error.to_string(), "opaque values cannot be bound");
}

#[tokio::test]
async fn it_scans_in_place_and_clears_on_failure() -> anyhow::Result<()> {
    let mut conn = new::<Sqlite>().await?;

    let row = sqlx::query("SELECT 'x,y', '', NULL")
        .fetch_one(&mut conn)
        .await?;

    let mut value = Custom::<Tags>::null();

    value
        .scan::<Sqlite>(row.try_get_raw(0)?)
        .map_err(|e| anyhow::anyhow!(e))?;

    assert_eq!(value, Custom::new(tags(&["x", "y"])));

    // a failed rescan must not leave the previous value looking present
    let error = value.scan::<Sqlite>(row.try_get_raw(1)?).unwrap_err();

    assert_eq!(error.to_string(), "empty tag list");
    assert!(!value.is_set());
    assert_eq!(value.val(), &Tags::default());

    value.set(tags(&["z"]));
    value
        .scan::<Sqlite>(row.try_get_raw(2)?)
        .map_err(|e| anyhow::anyhow!(e))?;

    assert!(!value.is_set());

    Ok(())
}

#[tokio::test]
async fn it_surfaces_decode_errors_from_the_user_type() -> anyhow::Result<()> {
    let mut conn = new::<Sqlite>().await?;

    let result = sqlx::query_scalar::<_, Custom<Tags>>("SELECT ''")
        .fetch_one(&mut conn)
        .await;

    match result {
        Err(sqlx::Error::ColumnDecode { source, .. }) => {
            assert_eq!(source.to_string(), "empty tag list");
        }

        other => panic!("expected a column decode error, got {other:?}"),
    }

    Ok(())
}

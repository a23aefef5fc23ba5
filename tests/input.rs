use std::io::Write;

use mpcstats::{
    Error,
    column::reveal_column,
    engine::SimulatedEngine,
    fixed::FixedPointConfig,
    input::{DEFAULT_SENTINEL, InputError, InputShape, PartyInput, share_table},
    stats,
    substrate::Substrate,
};
use tempfile::NamedTempFile;

const SHAPE: InputShape = InputShape {
    columns: 2,
    rows: 4,
};

fn record(contents: &str) -> Result<NamedTempFile, std::io::Error> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn joins_the_records_of_two_parties() -> Result<(), Error> {
    let party0 = record("0 1 2 3\n170 160 152 180\n").map_err(InputError::from)?;
    let party1 = record("3 0 4 5\n50 60 70 100\n").map_err(InputError::from)?;
    let input0 = PartyInput::read(party0.path(), SHAPE, Some(DEFAULT_SENTINEL))?;
    let input1 = PartyInput::read(party1.path(), SHAPE, Some(DEFAULT_SENTINEL))?;

    let mut engine = SimulatedEngine::new(2, FixedPointConfig::default())?;
    let heights = share_table(&mut engine, 0, &input0)?;
    let weights = share_table(&mut engine, 1, &input1)?;
    let joined = stats::join(&mut engine, &heights, &weights, 0, 0)?;
    assert_eq!(joined.rows(), 4);
    assert_eq!(
        reveal_column(&mut engine, joined.column(3)?)?,
        [Some(60.0), None, None, Some(50.0)]
    );

    let mean_height = stats::mean(&mut engine, joined.column(1)?);
    let mean_weight = stats::mean(&mut engine, joined.column(3)?);
    assert_eq!(engine.reveal(&mean_height)?, 165.5);
    assert_eq!(engine.reveal(&mean_weight)?, 55.0);
    Ok(())
}

#[test]
fn sentinels_in_records_are_missing_data() -> Result<(), Error> {
    let file = record("0 1 2 3\n170 999 152 180\n").map_err(InputError::from)?;
    let input = PartyInput::read(file.path(), SHAPE, Some(DEFAULT_SENTINEL))?;

    let mut engine = SimulatedEngine::new(3, FixedPointConfig::default())?;
    let table = share_table(&mut engine, 2, &input)?;
    let median = stats::median(&mut engine, table.column(1)?);
    assert_eq!(engine.reveal(&median)?, 170.0);
    Ok(())
}

#[test]
fn unreadable_records_are_reported() -> Result<(), Error> {
    let result = PartyInput::read("/nonexistent/party0.txt", SHAPE, None);
    assert!(matches!(result, Err(InputError::Io(_))));

    let mut engine = SimulatedEngine::new(2, FixedPointConfig::default())?;
    let input = PartyInput::new(vec![vec![Some(1.0)]], None);
    assert!(matches!(
        share_table(&mut engine, 2, &input),
        Err(Error::PartyDoesNotExist(2))
    ));
    Ok(())
}

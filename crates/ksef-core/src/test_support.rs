//! Sample KSeF documents shared by the unit tests.

/// Wrap a `Fa` body and optional extra root children into a KSeF document.
pub fn document(ns: &str, fa_body: &str, extra: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Faktura xmlns="{ns}">
  <Naglowek>
    <KodFormularza kodSystemowy="FA (2)" wersjaSchemy="1-0E">FA</KodFormularza>
    <WariantFormularza>2</WariantFormularza>
    <DataWytworzeniaFa>2024-03-01T10:15:00Z</DataWytworzeniaFa>
    <SystemInfo>Testowy ERP</SystemInfo>
  </Naglowek>
  <Fa>{fa_body}</Fa>{extra}
</Faktura>"#
    )
}

/// A complete invoice using every section the extractor understands.
pub fn full_invoice(ns: &str) -> String {
    let fa = r#"
    <KodWaluty>PLN</KodWaluty>
    <P_1>2024-03-01</P_1>
    <P_1M>Kraków</P_1M>
    <P_2>FV/2024/03/001</P_2>
    <P_6>2024-02-29</P_6>
    <P_13_1>100.00</P_13_1>
    <P_14_1>23.00</P_14_1>
    <P_13_6>50.00</P_13_6>
    <P_15>173.00</P_15>
    <Adnotacje>
      <P_16>2</P_16>
      <P_17>2</P_17>
      <P_18>2</P_18>
      <P_18A>2</P_18A>
      <P_23>2</P_23>
    </Adnotacje>
    <RodzajFaktury>VAT</RodzajFaktury>
    <DodatkowyOpis><Klucz>Projekt</Klucz><Wartosc>Migracja</Wartosc></DodatkowyOpis>
    <DodatkowyOpis><Klucz>Pusty</Klucz></DodatkowyOpis>
    <FaWiersz>
      <NrWierszaFa>1</NrWierszaFa>
      <P_7>Usługa wdrożeniowa</P_7>
      <P_8A>szt.</P_8A>
      <P_8B>1</P_8B>
      <P_9A>100.00</P_9A>
      <P_11>100.00</P_11>
      <P_12>23</P_12>
    </FaWiersz>
    <FaWiersz>
      <NrWierszaFa>2</NrWierszaFa>
      <P_7>Eksport towaru</P_7>
      <P_8A>kg</P_8A>
      <P_8B>5</P_8B>
      <P_9A>10.00</P_9A>
      <P_11>50.00</P_11>
      <P_12>0 WDT</P_12>
    </FaWiersz>
    <Platnosc>
      <Zaplacono>1</Zaplacono>
      <DataZaplaty>2024-03-02</DataZaplaty>
      <FormaPlatnosci>6</FormaPlatnosci>
      <RachunekBankowy>
        <NrRB>PL61109010140000071219812874</NrRB>
        <NazwaBanku>Bank Testowy S.A.</NazwaBanku>
      </RachunekBankowy>
    </Platnosc>
    <WarunkiTransakcji>
      <Zamowienia><DataZamowienia>2024-02-01</DataZamowienia><NrZamowienia>ZAM/7</NrZamowienia></Zamowienia>
      <Zamowienia><NrZamowienia>ZAM/8</NrZamowienia></Zamowienia>
    </WarunkiTransakcji>"#;

    let extra = r#"
  <Podmiot1>
    <DaneIdentyfikacyjne><NIP>5261040828</NIP><Nazwa>Sprzedawca Sp. z o.o.</Nazwa></DaneIdentyfikacyjne>
    <Adres><KodKraju>PL</KodKraju><AdresL1>ul. Długa 1</AdresL1><AdresL2>00-001 Warszawa</AdresL2></Adres>
    <DaneKontaktowe><Email>biuro@sprzedawca.pl</Email><Telefon>221234567</Telefon></DaneKontaktowe>
  </Podmiot1>
  <Podmiot2>
    <DaneIdentyfikacyjne><NIP>7740001454</NIP><Nazwa>Nabywca S.A.</Nazwa></DaneIdentyfikacyjne>
    <Adres><KodKraju>PL</KodKraju><AdresL1>ul. Krótka 2</AdresL1></Adres>
    <NrKlienta>K-42</NrKlienta>
  </Podmiot2>
  <Stopka>
    <Informacje><StopkaFaktury>Dziękujemy za współpracę</StopkaFaktury></Informacje>
    <Rejestry><KRS>0000123456</KRS><REGON>123456785</REGON><BDO>000012345</BDO></Rejestry>
  </Stopka>"#;

    document(ns, fa, extra)
}
